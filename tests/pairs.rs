use std::path::Path;

use image::{ImageBuffer, Rgb};
use srpair::{
    Backend, Compose, Error, Interpolation, PairReport, PipelineConfig, RandomPairGenerator,
    RandomPairParams, TransformConfig, build_pipeline, generate_pair, load_image,
    load_pipeline_config, make_rng, process_directory_to_dir, process_image_to_dir,
};

fn write_gradient_png(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}

fn patch_pipeline(patch_size: usize) -> Compose {
    scaled_patch_pipeline(patch_size, 2.0, 4.0)
}

fn scaled_patch_pipeline(patch_size: usize, scale_min: f64, scale_max: f64) -> Compose {
    Compose::new().with(
        RandomPairGenerator::new(
            scale_min,
            scale_max,
            Some(patch_size),
            Interpolation::Bicubic,
            Some(Backend::Fir),
        )
        .unwrap(),
    )
}

#[test]
fn single_image_writes_pair_and_sidecar() -> srpair::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("butterfly.png");
    write_gradient_png(&input, 160, 120);
    let out = dir.path().join("out");

    let mut rng = make_rng(Some(3));
    let report = process_image_to_dir(&input, &out, &patch_pipeline(24), &mut rng)?;

    assert_eq!(report.lq_shape, [24, 24, 3]);
    let scale = report.scale.unwrap();
    assert!((2.0..4.0).contains(&scale));
    let edge = (24.0 * scale).round_ties_even() as usize;
    assert_eq!(report.gt_shape, [edge, edge, 3]);

    assert_eq!(report.gt_path, out.join("butterfly_gt.png"));
    assert_eq!(report.lq_path, out.join("butterfly_lq.png"));
    assert_eq!(load_image(&report.lq_path)?.dim(), (24, 24, 3));
    assert_eq!(load_image(&report.gt_path)?.dim(), (edge, edge, 3));

    let text = std::fs::read_to_string(out.join("butterfly.json"))?;
    let sidecar: PairReport = serde_json::from_str(&text)?;
    assert_eq!(sidecar.source, input);
    assert_eq!(sidecar.gt_shape, report.gt_shape);
    assert_eq!(sidecar.lq_shape, report.lq_shape);
    assert!((sidecar.scale.unwrap() - scale).abs() < 1e-12);
    Ok(())
}

#[test]
fn same_seed_gives_identical_pairs() -> srpair::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("img.png");
    write_gradient_png(&input, 100, 90);
    let pipeline = patch_pipeline(16);

    let a = generate_pair(&input, &pipeline, &mut make_rng(Some(42)))?;
    let b = generate_pair(&input, &pipeline, &mut make_rng(Some(42)))?;
    assert_eq!(a.scalar("scale")?, b.scalar("scale")?);
    assert_eq!(a.image("gt")?, b.image("gt")?);
    assert_eq!(a.image("lq")?, b.image("lq")?);
    assert!(a.contains("gt_path"));
    Ok(())
}

#[test]
fn whole_image_mode_trims_gt_to_a_multiple() -> srpair::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("img.png");
    write_gradient_png(&input, 64, 50);
    let pipeline = Compose::new().with(RandomPairGenerator::new(
        2.0,
        2.0,
        None,
        Interpolation::Area,
        Some(Backend::Image),
    )?);

    let sample = generate_pair(&input, &pipeline, &mut make_rng(None))?;
    assert_eq!(sample.image("lq")?.dim(), (25, 32, 3));
    assert_eq!(sample.image("gt")?.dim(), (50, 64, 3));
    Ok(())
}

#[test]
fn directory_skips_non_images_and_counts_failures() -> srpair::Result<()> {
    let dir = tempfile::tempdir()?;
    let input_dir = dir.path().join("hr");
    std::fs::create_dir_all(&input_dir)?;
    write_gradient_png(&input_dir.join("a.png"), 128, 128);
    write_gradient_png(&input_dir.join("b.png"), 96, 140);
    // Too small for a 64px GT crop
    write_gradient_png(&input_dir.join("tiny.png"), 40, 40);
    std::fs::write(input_dir.join("notes.txt"), "not an image")?;
    let out = dir.path().join("pairs");

    let large = scaled_patch_pipeline(32, 2.0, 2.0);
    let report = process_directory_to_dir(&input_dir, &out, &large, &mut make_rng(Some(1)), true)?;
    assert_eq!(report.processed, 2);
    assert_eq!(report.errors, 1);
    assert_eq!(report.skipped, 1);
    assert!(!out.join("tiny_lq.png").exists());

    let small = scaled_patch_pipeline(16, 2.0, 2.0);
    let report = process_directory_to_dir(&input_dir, &out, &small, &mut make_rng(Some(1)), true)?;
    assert_eq!(report.processed, 3);
    assert_eq!(report.errors, 0);
    assert_eq!(report.skipped, 1);
    for stem in ["a", "b", "tiny"] {
        assert!(out.join(format!("{}_gt.png", stem)).is_file());
        assert!(out.join(format!("{}_lq.png", stem)).is_file());
        assert!(out.join(format!("{}.json", stem)).is_file());
    }
    Ok(())
}

#[test]
fn directory_stops_on_first_error_without_continue() -> srpair::Result<()> {
    let dir = tempfile::tempdir()?;
    write_gradient_png(&dir.path().join("small.png"), 20, 20);

    let result = process_directory_to_dir(
        dir.path(),
        &dir.path().join("out"),
        &patch_pipeline(16),
        &mut make_rng(Some(0)),
        false,
    );
    assert!(matches!(result, Err(Error::CropOutOfBounds { .. })));
    Ok(())
}

#[test]
fn pipeline_loads_from_json_config() -> srpair::Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("pipeline.json");
    std::fs::write(
        &config_path,
        r#"{
            "seed": 9,
            "transforms": [
                {"type": "random_pair", "scale_min": 4, "scale_max": 4, "patch_size": 8,
                 "interpolation": "bicubic", "backend": "fir"},
                {"type": "resize", "scale": 4, "input_key": "lq", "output_key": "lq_up",
                 "interpolation": "lanczos", "backend": "image"}
            ]
        }"#,
    )?;

    let config = load_pipeline_config(&config_path)?;
    assert_eq!(config.seed, Some(9));
    let pipeline = build_pipeline(&config)?;
    assert_eq!(pipeline.len(), 2);

    let input = dir.path().join("img.png");
    write_gradient_png(&input, 80, 80);
    let sample = generate_pair(&input, &pipeline, &mut make_rng(config.seed))?;
    assert_eq!(sample.image("gt")?.dim(), (32, 32, 3));
    assert_eq!(sample.image("lq")?.dim(), (8, 8, 3));
    assert_eq!(sample.image("lq_up")?.dim(), (32, 32, 3));
    Ok(())
}

#[test]
fn pipeline_with_unbound_key_is_rejected() {
    let config = PipelineConfig {
        seed: None,
        transforms: vec![
            TransformConfig::Resize(srpair::ResizeParams {
                scale: 0.5,
                input_key: "lq".to_string(),
                output_key: "lq_small".to_string(),
                interpolation: Interpolation::Bilinear,
                backend: None,
            }),
            TransformConfig::RandomPair(RandomPairParams::default()),
        ],
    };
    match build_pipeline(&config) {
        Err(Error::MissingKey { key }) => assert_eq!(key, "lq"),
        other => panic!("expected MissingKey, got {:?}", other),
    }
}
