use crate::common::*;

/// Run inference with a native-runtime export.
#[derive(Debug, Clone, StructOpt)]
pub struct Args {
    /// path to the exported weights file
    #[structopt(long)]
    pub weights: PathBuf,
    /// path to the input image
    #[structopt(long)]
    pub input: PathBuf,
    /// path to write the anomaly map image to
    #[structopt(long)]
    pub output: PathBuf,
}

pub fn infer(args: Args) -> Result<()> {
    let Args {
        weights,
        input,
        output,
    } = args;

    let inferencer = NativeInferencer::load(&weights)
        .with_context(|| format!("failed to load weights '{}'", weights.display()))?;
    let prediction = inferencer.predict(&input)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    save_anomaly_map(&prediction.anomaly_map, &output)?;
    info!("wrote anomaly map to '{}'", output.display());

    Ok(())
}
