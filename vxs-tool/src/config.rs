use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{App, Arg, ArgMatches};
use vxs_common::structure::{Mirror, Rotation};

#[derive(Clone, Debug)]
pub struct IoPaths {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
}

#[derive(Clone, Debug)]
pub struct TransformOptions {
    /// Author of the transformed copy, `None` keeps the source author.
    pub author: Option<String>,
    /// Zero bumps the source version by one.
    pub version: i32,
    pub rotation: Rotation,
    pub mirror: Mirror,
    pub reorient: bool,
}

#[derive(Clone, Debug)]
pub enum Command {
    Info { input_file: PathBuf },
    Dump { io: IoPaths },
    Transform { io: IoPaths, options: TransformOptions },
    Render { io: IoPaths, registry: Option<PathBuf> },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub command: Command,
}

fn input_arg() -> Arg<'static> {
    Arg::with_name("INPUT")
        .help("Structure file, gzip-compressed NBT")
        .index(1)
        .required(true)
}

fn output_arg(help: &'static str) -> Arg<'static> {
    Arg::with_name("OUTPUT").help(help).index(2).required(true)
}

fn io_paths(matches: &ArgMatches) -> Result<IoPaths> {
    Ok(IoPaths {
        input_file: PathBuf::from(
            matches
                .value_of_os("INPUT")
                .ok_or_else(|| anyhow!("Missing input file"))?,
        ),
        output_file: PathBuf::from(
            matches
                .value_of_os("OUTPUT")
                .ok_or_else(|| anyhow!("Missing output file"))?,
        ),
    })
}

fn transform_options(matches: &ArgMatches) -> Result<TransformOptions> {
    let degrees: i32 = matches
        .value_of("ROTATE")
        .unwrap_or("0")
        .parse()
        .context("Parsing rotate argument")?;
    let rotation = Rotation::from_degrees(degrees)
        .ok_or_else(|| anyhow!("Rotation must be a multiple of 90 degrees, got {}", degrees))?;

    let mirror_name = matches.value_of("MIRROR").unwrap_or("none");
    let mirror = Mirror::from_name(mirror_name)
        .ok_or_else(|| anyhow!("Unknown mirror {:?}", mirror_name))?;

    Ok(TransformOptions {
        author: matches.value_of("AUTHOR").map(str::to_owned),
        version: matches
            .value_of("VERSION")
            .unwrap_or("0")
            .parse()
            .context("Parsing version argument")?,
        rotation,
        mirror,
        reorient: matches.is_present("REORIENT"),
    })
}

pub fn parse_args() -> Result<Config> {
    let matches = App::new("VXS structure tool")
        .version(env!("CARGO_PKG_VERSION"))
        .author(clap::crate_authors!())
        .about("Inspect, transform and re-materialize block structure files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            App::new("info")
                .about("Print a summary of a structure file")
                .arg(input_arg()),
        )
        .subcommand(
            App::new("dump")
                .about("Write a structure file as JSON")
                .arg(input_arg())
                .arg(output_arg("JSON output file location")),
        )
        .subcommand(
            App::new("transform")
                .about("Copy a structure, optionally rotating and mirroring it")
                .arg(input_arg())
                .arg(output_arg("Output structure file location"))
                .arg(
                    Arg::with_name("AUTHOR")
                        .long("author")
                        .value_name("AUTHOR")
                        .help("Author of the copy, defaults to the source author"),
                )
                .arg(
                    Arg::with_name("VERSION")
                        .long("version")
                        .value_name("VERSION")
                        .help("Version of the copy, 0 or less bumps the source version")
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::with_name("ROTATE")
                        .long("rotate")
                        .value_name("DEGREES")
                        .possible_values(["0", "90", "180", "270"])
                        .default_value("0"),
                )
                .arg(
                    Arg::with_name("MIRROR")
                        .long("mirror")
                        .value_name("AXIS")
                        .possible_values(["none", "x", "z"])
                        .default_value("none"),
                )
                .arg(
                    Arg::with_name("REORIENT")
                        .long("reorient")
                        .help("Also turn facing, rotation and axis properties"),
                ),
        )
        .subcommand(
            App::new("render")
                .about("Place a structure into an empty block grid and write it as JSON")
                .arg(input_arg())
                .arg(output_arg("JSON output file location"))
                .arg(
                    Arg::with_name("REGISTRY")
                        .long("registry")
                        .value_name("REGISTRY")
                        .help("JSON block type registry, inferred from the palette if absent"),
                ),
        )
        .get_matches();

    let command = match matches.subcommand() {
        Some(("info", sub)) => Command::Info {
            input_file: PathBuf::from(
                sub.value_of_os("INPUT")
                    .ok_or_else(|| anyhow!("Missing input file"))?,
            ),
        },
        Some(("dump", sub)) => Command::Dump { io: io_paths(sub)? },
        Some(("transform", sub)) => Command::Transform {
            io: io_paths(sub)?,
            options: transform_options(sub).context("Parsing transform options")?,
        },
        Some(("render", sub)) => Command::Render {
            io: io_paths(sub)?,
            registry: sub.value_of_os("REGISTRY").map(PathBuf::from),
        },
        Some((other, _)) => return Err(anyhow!("Unknown subcommand {}", other)),
        None => return Err(anyhow!("No subcommand given")),
    };

    Ok(Config { command })
}
