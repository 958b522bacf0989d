mod config;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use log::{debug, info};
use vxs_common::block_storage::{BlockStorage, Position};
use vxs_common::structure::{OrientationRules, Structure};
use vxs_common::world::TypeRegistry;

use config::{Command, Config, IoPaths, TransformOptions};

fn read_structure(path: &Path) -> Result<Structure> {
    Structure::read_from_path(path)
        .with_context(|| anyhow!("Reading structure from {}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut outf = BufWriter::new(
        File::create(path).with_context(|| anyhow!("Creating {}", path.display()))?,
    );
    serde_json::ser::to_writer(&mut outf, value)?;
    outf.flush()?;
    Ok(())
}

fn do_info(input_file: &Path) -> Result<()> {
    let structure = read_structure(input_file)?;

    info!("{}", structure);
    info!(
        "{} palette entries, {} blocks",
        structure.palette().len(),
        structure.blocks().len()
    );

    let counts = structure
        .iter_blocks()
        .map(|(_, item)| item.name.as_str())
        .counts();
    for (name, count) in counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)))
    {
        info!("{:>8} {}", count, name);
    }

    Ok(())
}

fn do_dump(io: &IoPaths) -> Result<()> {
    let structure = read_structure(&io.input_file)?;
    write_json(&io.output_file, &structure).context("Writing structure JSON")
}

fn do_transform(io: &IoPaths, options: &TransformOptions) -> Result<()> {
    let source = read_structure(&io.input_file)?;
    let author = options
        .author
        .clone()
        .unwrap_or_else(|| source.author().to_owned());

    let copy = source
        .copy(author, options.version)
        .context("Copying structure")?;

    let transformed = if options.reorient {
        let rules = OrientationRules::default();
        copy.rotate_oriented(options.rotation, &rules)
            .mirror_oriented(options.mirror, &rules)
    } else {
        copy.rotate(options.rotation).mirror(options.mirror)
    };

    info!(
        "Writing {} (rotated {} degrees, mirror {:?})",
        transformed,
        options.rotation.degrees(),
        options.mirror
    );
    transformed
        .write_to_path(&io.output_file)
        .with_context(|| anyhow!("Writing structure to {}", io.output_file.display()))
}

fn do_render(io: &IoPaths, registry: Option<&Path>) -> Result<()> {
    let structure = read_structure(&io.input_file)?;

    let registry = match registry {
        Some(path) => {
            let inf = File::open(path)
                .with_context(|| anyhow!("Opening registry {}", path.display()))?;
            TypeRegistry::from_json_reader(inf).context("Loading block type registry")?
        }
        None => {
            debug!("No registry given, inferring one from the palette");
            TypeRegistry::infer_from(structure.palette())
        }
    };

    let [sx, sy, sz] = *structure.size();
    let mut output = BlockStorage::new(sx, sy, sz).context("Allocating output grid")?;
    structure
        .load_all(&mut output, &registry, Position::default())
        .context("Placing structure")?;

    info!(
        "Rendered {} into {} distinct block states",
        structure,
        output.palette().len()
    );
    write_json(&io.output_file, &output).context("Writing block grid JSON")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let Config { command } = config::parse_args()?;

    match &command {
        Command::Info { input_file } => do_info(input_file),
        Command::Dump { io } => do_dump(io),
        Command::Transform { io, options } => do_transform(io, options),
        Command::Render { io, registry } => do_render(io, registry.as_deref()),
    }
}
