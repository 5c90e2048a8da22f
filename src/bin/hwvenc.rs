use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hwvenc::{
    AttrStore, CodingType, GeometryTable, PixelFormat, ProfileRegistry, SizeRequest, StageCfg,
    StrideCalculator,
};

#[derive(Parser, Debug)]
#[command(name = "hwvenc", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stride and size layout of one frame.
    Geometry(GeometryArgs),
    /// Inspect encoder configs.
    #[command(subcommand)]
    Cfg(CfgCommand),
}

#[derive(Subcommand, Debug)]
enum CfgCommand {
    /// Load an attribute profile and print it with stage diagnostics.
    Show(CfgShowArgs),
    /// List the well-known attribute keys.
    Schema,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    /// Coding type, e.g. `avc`, `hevc`, `mjpeg`.
    #[arg(long)]
    coding: CodingType,

    /// Pixel format, e.g. `yuv420sp`, `rgba8888`.
    #[arg(long)]
    format: PixelFormat,

    /// Frame width in pixels.
    #[arg(long)]
    width: u32,

    /// Frame height in rows.
    #[arg(long)]
    height: u32,

    /// Use the FBC compressed layout.
    #[arg(long, default_value_t = false)]
    fbc: bool,

    /// Byte stride to keep when valid.
    #[arg(long)]
    byte_stride: Option<u32>,

    /// Vertical stride to keep when valid.
    #[arg(long)]
    v_stride: Option<u32>,

    /// Geometry table JSON replacing the built-in constants.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Print the layout as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct CfgShowArgs {
    /// Attribute profile JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Profile name selecting the lifecycle stage.
    #[arg(long, default_value = "init")]
    stage: String,

    /// Extra profile names (JSON object of name to stage) merged over the built-ins.
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Print the committed attributes as JSON instead of the text dump.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Geometry(args) => cmd_geometry(args),
        Command::Cfg(CfgCommand::Show(args)) => cmd_cfg_show(args),
        Command::Cfg(CfgCommand::Schema) => {
            print!("{}", hwvenc::schema_dump());
            Ok(())
        }
    }
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let calc = match &args.table {
        Some(path) => {
            let table = GeometryTable::from_path(path)
                .with_context(|| format!("load geometry table '{}'", path.display()))?;
            StrideCalculator::new(table)?
        }
        None => StrideCalculator::builtin().clone(),
    };

    let req = SizeRequest {
        byte_stride: args.byte_stride,
        v_stride: args.v_stride,
        ..SizeRequest::new(args.coding, args.format, args.fbc, args.width, args.height)
    };
    let layout = calc.frame_size(&req).with_context(|| {
        format!(
            "lay out {} {} {}x{}",
            args.coding, args.format, args.width, args.height
        )
    })?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&layout).context("serialize frame layout")?
        );
        return Ok(());
    }

    println!("h_stride_by_pixel {}", layout.h_stride_by_pixel);
    println!("h_stride_by_byte  {}", layout.h_stride_by_byte);
    println!("v_stride          {}", layout.v_stride);
    println!("size_total        {}", layout.size_total);
    if layout.is_compressed() {
        println!("size_fbc_hdr      {}", layout.size_fbc_hdr);
        println!("size_fbc_bdy      {}", layout.size_fbc_bdy);
        println!("fbc_bdy_offset    {}", layout.fbc_bdy_offset);
    }
    Ok(())
}

fn cmd_cfg_show(args: CfgShowArgs) -> anyhow::Result<()> {
    let mut registry = ProfileRegistry::builtin().clone();
    if let Some(path) = &args.profiles {
        let extra = ProfileRegistry::from_path(path)
            .with_context(|| format!("load profile registry '{}'", path.display()))?;
        registry.merge(&extra);
    }
    let stage = registry.resolve(&args.stage)?;

    let store = AttrStore::from_path(&args.in_path)
        .with_context(|| format!("load attribute profile '{}'", args.in_path.display()))?;
    let cfg = StageCfg::from_store(stage, store);

    for issue in cfg.validate() {
        eprintln!("warning: {issue}");
    }
    if args.json {
        println!("{}", cfg.attrs().to_json_string()?);
    } else {
        print!("{}", cfg.dump());
    }
    Ok(())
}
