use tracing::info;
use tracing_subscriber::EnvFilter;

use srpair::{
    PipelineConfig, RandomPairParams, TransformConfig, build_pipeline, load_pipeline_config,
    make_rng, process_directory_to_dir, process_image_to_dir, set_default_backend,
};

use super::args::CliArgs;
use super::errors::AppError;

/// Pipeline from `--config`, or a single random-pair stage built from the inline options.
/// `--seed` wins over the config's seed.
fn pipeline_config(args: &CliArgs) -> Result<PipelineConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => load_pipeline_config(path)?,
        None => PipelineConfig {
            seed: None,
            transforms: vec![TransformConfig::RandomPair(RandomPairParams {
                scale_min: args.scale_min,
                scale_max: args.scale_max,
                patch_size: args.patch_size,
                interpolation: args.interpolation,
                backend: args.backend,
            })],
        },
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    if args.input.is_some() && args.input_dir.is_some() {
        return Err(AppError::ConflictingInputs.into());
    }
    let output_dir = args.output_dir.clone().ok_or(AppError::MissingArgument {
        arg: "--output-dir".to_string(),
    })?;

    if let Some(backend) = args.default_backend {
        set_default_backend(backend);
    }

    let config = pipeline_config(&args)?;
    let pipeline = build_pipeline(&config).map_err(AppError::from)?;
    info!("Pipeline: {}", pipeline);
    let mut rng = make_rng(config.seed);

    if let Some(input_dir) = &args.input_dir {
        info!("Starting batch processing from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = process_directory_to_dir(
            input_dir,
            &output_dir,
            &pipeline,
            &mut rng,
            args.continue_on_error,
        )
        .map_err(AppError::from)?;

        info!("Batch processing complete!");
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.clone().ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;

        let report =
            process_image_to_dir(&input, &output_dir, &pipeline, &mut rng).map_err(AppError::from)?;
        info!(
            "Successfully processed: {:?} -> {:?}, {:?} (scale {:?})",
            input, report.gt_path, report.lq_path, report.scale
        );
    }

    Ok(())
}
