mod obj;

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hgtmesh::{build_mesh, Elev, GeoCoord, HgtFormat, TerrainTile};
use log::info;
use serde::Serialize;
use std::{fs::File, io::BufWriter};

/// An SRTM '.hgt' terrain mesh multitool.
#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: SubCmd,
}

#[derive(Clone, Debug, Subcommand)]
enum SubCmd {
    /// Write a '.hgt' file's terrain mesh as Wavefront OBJ.
    Mesh(MeshArgs),
    /// Print the elevation at a location.
    Height(HeightArgs),
    /// Print a JSON summary of a '.hgt' file.
    Info(TileArgs),
    /// Render a '.hgt' file as a grayscale image.
    Render(RenderArgs),
}

#[derive(Args, Clone, Debug)]
struct TileArgs {
    /// Source '.hgt' file.
    src: Utf8PathBuf,

    /// SW corner as 'lat,lon'.
    ///
    /// If not specified, it is parsed from the file name
    /// (e.g. 'N49E016.hgt').
    #[arg(long, value_parser = parse_origin, allow_hyphen_values = true)]
    origin: Option<GeoCoord>,

    /// Sample resolution of the source file.
    #[arg(long, value_enum, default_value_t = Format::Srtm3)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// 1 arcsecond, 3601x3601.
    Srtm1,
    /// 3 arcsecond, 1201x1201.
    Srtm3,
}

impl From<Format> for HgtFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Srtm1 => HgtFormat::SRTM1,
            Format::Srtm3 => HgtFormat::SRTM3,
        }
    }
}

#[derive(Args, Clone, Debug)]
struct MeshArgs {
    #[command(flatten)]
    tile: TileArgs,

    /// Optional output file name.
    ///
    /// If not specified, an '.obj' will be written with the tile's
    /// basename in the tile's dir.
    dest: Option<Utf8PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct HeightArgs {
    #[command(flatten)]
    tile: TileArgs,

    /// Latitude in degrees.
    #[arg(allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees.
    #[arg(allow_hyphen_values = true)]
    lon: f64,
}

#[derive(Args, Clone, Debug)]
struct RenderArgs {
    #[command(flatten)]
    tile: TileArgs,

    /// Optional output file name.
    ///
    /// Image format will be based on `dest`'s extension.
    ///
    /// If not specified, a png will be written with the tile's
    /// basename in the tile's dir.
    dest: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct TileInfo<'a> {
    path: &'a str,
    format: HgtFormat,
    origin: GeoCoord,
    angular_step: f64,
    longitude_step_distance: f64,
    latitude_step_distance: f64,
    min_elevation: Elev,
    max_elevation: Elev,
    mesh_cells: usize,
}

fn parse_origin(s: &str) -> Result<GeoCoord> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected 'lat,lon', got {s:?}"))?;
    Ok(GeoCoord::new(lat.trim().parse()?, lon.trim().parse()?))
}

fn load(TileArgs { src, origin, format }: &TileArgs) -> Result<TerrainTile> {
    let origin = match origin {
        Some(origin) => *origin,
        None => GeoCoord::from_hgt_path(src)
            .with_context(|| format!("{src} has no origin in its name, pass --origin"))?,
    };
    info!("loading {src} at ({}, {})", origin.latitude, origin.longitude);
    let tile = TerrainTile::load_with_format(src, origin, (*format).into())?;
    Ok(tile)
}

/// Returns `dest`, or `src` with `ext` when `dest` is absent or a
/// directory.
fn output_path(src: &Utf8Path, dest: Option<Utf8PathBuf>, ext: &str) -> Result<Utf8PathBuf> {
    let out = match dest {
        None => src.with_extension(ext),
        Some(mut out) if out.is_dir() => {
            let name = src
                .file_name()
                .ok_or_else(|| anyhow!("{src} has no file name"))?;
            out.push(name);
            out.set_extension(ext);
            out
        }
        Some(out) => out,
    };
    Ok(out)
}

fn mesh(MeshArgs { tile, dest }: MeshArgs) -> Result<()> {
    let out = output_path(&tile.src, dest, "obj")?;
    let tile = load(&tile)?;
    let mesh = build_mesh(&tile);
    info!("writing {} cells to {out}", mesh.cell_count());
    let file = File::create(&out).with_context(|| format!("creating {out}"))?;
    obj::write(BufWriter::new(file), &mesh).with_context(|| format!("writing {out}"))?;
    Ok(())
}

fn height(HeightArgs { tile: args, lat, lon }: HeightArgs) -> Result<()> {
    let tile = load(&args)?;
    let elev = tile
        .height_at(GeoCoord::new(lat, lon))
        .ok_or_else(|| anyhow!("({lat}, {lon}) is not covered by {}", args.src))?;
    println!("{elev}");
    Ok(())
}

fn info(args: TileArgs) -> Result<()> {
    let tile = load(&args)?;
    let cells_per_side = tile.size().saturating_sub(1);
    let info = TileInfo {
        path: args.src.as_str(),
        format: args.format.into(),
        origin: tile.origin(),
        angular_step: tile.angular_step(),
        longitude_step_distance: tile.longitude_step_distance(),
        latitude_step_distance: tile.latitude_step_distance(),
        min_elevation: tile.min_elevation(),
        max_elevation: tile.max_elevation(),
        mesh_cells: cells_per_side * cells_per_side,
    };
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn render(RenderArgs { tile, dest }: RenderArgs) -> Result<()> {
    let out = output_path(&tile.src, dest, "png")?;
    let tile = load(&tile)?;
    info!("writing to {out}");
    if let Some("png" | "tif" | "tiff") = out.extension() {
        let img = tile.to_image::<u16>();
        img.save(&out)?;
    } else {
        let img = tile.to_image::<u8>();
        img.save(&out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        SubCmd::Mesh(args) => mesh(args),
        SubCmd::Height(args) => height(args),
        SubCmd::Info(args) => info(args),
        SubCmd::Render(args) => render(args),
    }
}
