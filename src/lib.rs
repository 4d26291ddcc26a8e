#![doc = r#"
SRPAIR: low-resolution / high-resolution training pair synthesis for super-resolution.

This crate provides the two data-augmentation transforms of a super-resolution training
pipeline, a typed `Sample` record for them to operate on, and a thin resize dispatch over
two resampling backends (`fast_image_resize` and `image::imageops`):

- [`Resizer`] rescales one named image by a fixed factor.
- [`RandomPairGenerator`] draws a random scale, optionally crops a random patch from the
  `"gt"` image and derives the matching `"lq"` image.

Both implement [`Transform`] and can be chained with [`Compose`], built by hand or from a
JSON [`PipelineConfig`].

Generate a pair in memory
-------------------------
```rust
use ndarray::Array3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use srpair::{
    Backend, ImageArray, Interpolation, RandomPairGenerator, Sample, Transform, GT_KEY, LQ_KEY,
    SCALE_KEY,
};

fn main() -> srpair::Result<()> {
    let generator =
        RandomPairGenerator::new(2.0, 4.0, Some(48), Interpolation::Bicubic, Some(Backend::Fir))?;
    let sample = Sample::from_single(GT_KEY, ImageArray::U8(Array3::zeros((256, 256, 3))));

    let mut rng = StdRng::seed_from_u64(0);
    let sample = generator.apply(sample, &mut rng)?;

    assert_eq!(sample.image(LQ_KEY)?.dim(), (48, 48, 3));
    let scale = sample.scalar(SCALE_KEY)?;
    assert!((2.0..4.0).contains(&scale));
    Ok(())
}
```

Process a directory from a config file
--------------------------------------
```rust,no_run
use std::path::Path;
use srpair::{build_pipeline, load_pipeline_config, make_rng, process_directory_to_dir};

fn main() -> srpair::Result<()> {
    let config = load_pipeline_config(Path::new("pipelines/x4_patch48.json"))?;
    let pipeline = build_pipeline(&config)?;
    let mut rng = make_rng(config.seed);

    let report = process_directory_to_dir(
        Path::new("/data/DIV2K_train_HR"),
        Path::new("/out/pairs"),
        &pipeline,
        &mut rng,
        true, // continue_on_error
    )?;
    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All public functions return `srpair::Result<T>`; match on `srpair::Error` to handle specific
cases, e.g. a missing sample key or a patch that does not fit the source image.

Useful modules
--------------
- [`api`]: high-level, file-based entry points.
- [`transforms`]: the `Transform` trait, `Compose`, `Resizer`, `RandomPairGenerator`.
- [`core`]: image containers, the `Sample` record, params and resize dispatch.
- [`io`]: image file reading/writing and pair sidecars.
- [`types`]: `Interpolation`, `Backend`, `DType`, `Size`.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod transforms;
pub mod types;

// Curated public API surface
// Types
pub use core::image::{AsArray, FromArray, ImageArray, Tensor};
pub use core::params::{PipelineConfig, RandomPairParams, ResizeParams, TransformConfig};
pub use core::sample::{GT_KEY, GT_PATH_KEY, LQ_KEY, SCALE_KEY, Sample, Value};
pub use error::{Error, Result};
pub use types::{Backend, DType, Interpolation, Size};

// Resize dispatch
pub use core::processing::backend::{default_backend, set_default_backend};
pub use core::processing::resize::{resize_fn, resize_value};

// Transforms
pub use transforms::{Compose, RandomPairGenerator, Resizer, Transform};

// High-level API re-exports
pub use api::{
    BatchReport, build_pipeline, generate_pair, load_pipeline_config, load_sample, make_rng,
    process_directory_to_dir, process_image_to_dir,
};
pub use io::writers::PairReport;
pub use io::{load_image, save_image};
