//! SIMM 2.1 credit qualifying parameters

use analytics_margin::credit::{BucketId, CreditRiskClassSettings, CRQ_21};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{emit, Report, RunContext};
use crate::Result;

/// Arguments of `simm-crq`
#[derive(Args, Debug, Clone)]
pub struct SimmCrqArgs {
    /// Bucket of the correlation row printed below the table
    #[arg(long, default_value = "1")]
    pub bucket: String,
}

/// Correlation of one bucket pair
#[derive(Debug, Clone, Serialize)]
pub struct BucketCorrelation {
    pub other: BucketId,
    pub correlation: f64,
}

/// Result of `simm-crq`
#[derive(Debug, Clone, Serialize)]
pub struct SimmCrqReport {
    pub settings: CreditRiskClassSettings,
    pub bucket: BucketId,
    pub correlations: Vec<BucketCorrelation>,
}

impl Report for SimmCrqReport {
    fn title(&self) -> String {
        format!("SIMM {} {}", self.settings.version, self.settings.name)
    }

    fn print_text(&self) {
        let s = &self.settings;
        println!(
            "{:<8} {:<7} {:>8} {:>10}  sectors",
            "bucket", "quality", "weight", "threshold"
        );
        for b in s.buckets {
            println!(
                "{:<8} {:<7} {:>8} {:>10}  {}",
                b.number,
                b.quality.to_string(),
                b.risk_weight,
                b.concentration_threshold,
                b.sectors.join(", ")
            );
        }
        println!(
            "{:<8} {:<7} {:>8} {:>10}",
            "residual", "", s.residual_risk_weight, s.residual_concentration_threshold
        );
        println!();
        println!("{:<28} {}", "Vega risk weight:", s.vega_risk_weight);
        if let Some(base) = s.base_correlation {
            println!("{:<28} {}", "Base correlation weight:", base.risk_weight);
            println!("{:<28} {}", "Base correlation rho:", base.correlation);
        }
        let intra = s.intra_bucket;
        println!(
            "{:<28} same {} / different {}",
            "Intra-bucket:", intra.same_issuer, intra.different_issuer
        );
        println!(
            "{:<28} same {} / different {}",
            "Intra-bucket (residual):", intra.residual_same_issuer, intra.residual_different_issuer
        );
        println!();
        println!("Cross-bucket correlations of bucket {}:", self.bucket);
        for c in &self.correlations {
            println!("  {:>3} {:>6.2}", c.other.to_string(), c.correlation);
        }
    }
}

/// Collects the calibration and one correlation row
pub fn compute(args: &SimmCrqArgs) -> Result<SimmCrqReport> {
    let bucket: BucketId = args.bucket.parse()?;
    let correlations = CRQ_21
        .buckets
        .iter()
        .map(|b| {
            let other = BucketId::Numbered(b.number);
            Ok(BucketCorrelation {
                other,
                correlation: CRQ_21.cross_bucket_correlation(bucket, other)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SimmCrqReport {
        settings: CRQ_21,
        bucket,
        correlations,
    })
}

/// Run the simm-crq command
pub fn run(args: &SimmCrqArgs, ctx: &RunContext) -> Result<()> {
    info!(bucket = %args.bucket, "printing credit qualifying settings");
    emit(&compute(args)?, ctx)
}
