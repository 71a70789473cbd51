use argh::FromArgs;
use std::path::PathBuf;

use nebula_3d::io;
use nebula_reg::session::{CloudSlot, RegistrationSession, SyntheticDataset};

#[derive(FromArgs)]
/// Register a source point cloud against a target from the command line
struct Args {
    /// path to the source cloud (.ply or .pcd)
    #[argh(option, short = 's')]
    source: Option<PathBuf>,

    /// path to the target cloud (.ply or .pcd)
    #[argh(option, short = 't')]
    target: Option<PathBuf>,

    /// built-in dataset used when no files are given: sphere or cube (default: sphere)
    #[argh(option, short = 'd', default = "String::from(\"sphere\")")]
    dataset: String,

    /// print the advisory prompt instead of sending it anywhere
    #[argh(switch)]
    advisory: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut session = RegistrationSession::new();

    match (&args.source, &args.target) {
        (Some(source_path), Some(target_path)) => {
            let source = io::read_point_cloud(source_path)?;
            let target = io::read_point_cloud(target_path)?;
            session.ingest(CloudSlot::Source, source.points())?;
            session.ingest(CloudSlot::Target, target.points())?;
            if let Some(offset) = session.world_offset() {
                log::info!("world offset applied: {offset:?}");
            }
        }
        (None, None) => {
            let dataset = match args.dataset.as_str() {
                "sphere" => SyntheticDataset::Sphere,
                "cube" => SyntheticDataset::Cube,
                other => return Err(format!("unknown dataset: {other}").into()),
            };
            session.load_synthetic(dataset, &mut rand::rng());
        }
        _ => return Err("provide both --source and --target, or neither".into()),
    }

    println!(
        "loaded source={} target={} points, slider range {}",
        session.source().len(),
        session.target().len(),
        session.slider_range()
    );

    if let Some(frame) = session.refit_scene() {
        println!("camera: {}", serde_json::to_string(&frame)?);
    }

    println!("rmse before auto-align: {:.4}", session.rmse());
    session.auto_align()?;
    println!("rmse after auto-align:  {:.4}", session.rmse());
    println!(
        "transform: {}",
        serde_json::to_string(session.transform())?
    );

    if args.advisory {
        let payload = session.advisory_payload()?;
        println!("\n--- advisory prompt ---\n{}", payload.to_prompt());
    }

    Ok(())
}
