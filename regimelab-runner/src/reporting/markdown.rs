//! Markdown report generator.

use regimelab_core::domain::{PortfolioVariant, VolRegime};

use super::table::{ResultsTable, COLUMNS};
use crate::runner::RunResult;

pub struct MarkdownReportGenerator;

impl MarkdownReportGenerator {
    pub fn generate(&self, result: &RunResult) -> String {
        let d = &result.diagnostics;
        let cfg = &result.config;
        let mut report = format!(
            "# RegimeLab Run Report\n\n\
Run ID: `{}`\n\n\
## Inputs\n\
- Price: {} ({:?})\n\
- Volatility: {} ({:?})\n\
- Evaluation window: {} to {} ({} rows)\n",
            result.fingerprint.short_id(),
            result.inputs.price_name,
            result.inputs.price_source,
            result.inputs.vol_name,
            result.inputs.vol_source,
            d.first_date,
            d.last_date,
            d.evaluated_rows,
        );
        if result.inputs.has_synthetic() {
            report.push_str("\n> Synthetic data: not a market result.\n");
        }

        report.push_str(&format!(
            "\n## Strategy\n\
- Signal: MA({}) > MA({}) and {} < RSI({}) < {}\n\
- Regime: {}-day z-score of volatility, thresholds {} / {}\n\
- Exposure: low {}, medium {}, high {}\n",
            cfg.strategy.ma_short,
            cfg.strategy.ma_long,
            cfg.strategy.rsi_lower,
            cfg.strategy.rsi_period,
            cfg.strategy.rsi_upper,
            cfg.regime.window,
            cfg.regime.medium_threshold,
            cfg.regime.high_threshold,
            cfg.regime.low_exposure,
            cfg.regime.medium_exposure,
            cfg.regime.high_exposure,
        ));

        // Results table
        let table = ResultsTable::from_result(result);
        report.push_str("\n## Results\n\n| Portfolio |");
        for col in COLUMNS {
            report.push_str(&format!(" {col} |"));
        }
        report.push_str("\n|-----------|");
        for _ in COLUMNS {
            report.push_str("------:|");
        }
        report.push('\n');
        let places = table.decimals as usize;
        for variant in PortfolioVariant::ALL {
            if let Some(row) = table.row(variant) {
                let sharpe = row
                    .sharpe
                    .map_or_else(|| "NaN".to_string(), |s| format!("{s:.places$}"));
                report.push_str(&format!(
                    "| {} | {:.places$} | {:.places$} | {} | {:.places$} |\n",
                    row.label(),
                    row.total_return,
                    row.annualized_return,
                    sharpe,
                    row.max_drawdown,
                ));
            }
        }

        // Regime occupancy
        report.push_str("\n## Regimes\n\n| Regime | Rows | Share |\n|--------|-----:|------:|\n");
        for regime in VolRegime::ALL {
            let count = d.regime_counts.get(regime);
            let share = if d.evaluated_rows > 0 {
                count as f64 / d.evaluated_rows as f64 * 100.0
            } else {
                0.0
            };
            report.push_str(&format!("| {regime} | {count} | {share:.1}% |\n"));
        }

        report.push_str(&format!(
            "\n## Diagnostics\n\
- Aligned rows: {} (price {}, volatility {})\n\
- Unmatched dates: price {}, volatility {}\n\
- Rows trimmed for warm-up/undefined values: {}\n\
- Long signal: {:.1}% of rows\n\
- Config hash: `{}`\n\
- Dataset hash: `{}`\n",
            d.aligned_rows,
            d.price_rows,
            d.vol_rows,
            d.unmatched_price,
            d.unmatched_vol,
            d.trimmed_rows,
            d.long_fraction * 100.0,
            result.fingerprint.config_hash,
            result.fingerprint.dataset_hash,
        ));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regimelab_core::data::SyntheticConfig;

    use crate::config::RunConfig;
    use crate::data_loader::synthetic_providers;
    use crate::runner::run_from_providers;

    #[test]
    fn report_has_all_sections_and_rows() {
        let (p, v) = synthetic_providers(SyntheticConfig {
            trading_days: 250,
            ..SyntheticConfig::default()
        });
        let result = run_from_providers(&p, &v, &RunConfig::default()).unwrap();
        let report = MarkdownReportGenerator.generate(&result);

        for heading in ["## Inputs", "## Strategy", "## Results", "## Regimes", "## Diagnostics"] {
            assert!(report.contains(heading), "missing {heading}");
        }
        for label in ["| Price Only |", "| Price + VIX |", "| Buy & Hold |"] {
            assert!(report.contains(label), "missing row {label}");
        }
        assert!(report.contains("Synthetic data"));
        assert!(report.contains(result.fingerprint.short_id()));
    }
}
