use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use image_input::{
    ImageInput, ImageInputProps, MaxSize, OutputFormat, PickedFile, ResizeOptions,
};

#[derive(Parser)]
#[command(name = "image-input")]
#[command(version, about = "Pick an image as the form control would", long_about = None)]
struct Cli {
    /// Image file to pick
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Widget props as JSON (camelCase, e.g. {"maxSize": {"width": 100, "height": 100}})
    #[arg(short, long, value_name = "FILE")]
    props: Option<PathBuf>,

    /// Maximum width of the picked image
    #[arg(long, value_name = "PX", requires = "max_height")]
    max_width: Option<u32>,

    /// Maximum height of the picked image
    #[arg(long, value_name = "PX", requires = "max_width")]
    max_height: Option<u32>,

    /// Re-encode resized images as JPEG with this quality
    #[arg(long, value_name = "1-100", value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Print the resulting data URI instead of the view
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> image_input::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut props = match &cli.props {
        Some(path) => ImageInputProps::from_file(path).await?,
        None => ImageInputProps::default(),
    };

    if let (Some(width), Some(height)) = (cli.max_width, cli.max_height) {
        props.max_size = Some(MaxSize::new(width, height)?);
    }

    let mut options = ResizeOptions::default();
    if let Some(quality) = cli.jpeg_quality {
        options.format = OutputFormat::Jpeg { quality };
    }

    let mut input = ImageInput::new(props)
        .with_resize_options(options)
        .on_change(|value| info!("onChange fired ({} chars)", value.as_str().len()));

    input.pick(Some(PickedFile::from_path(cli.file))).await?;

    if cli.raw {
        println!("{}", input.value());
    } else {
        println!("{}", input.view().to_json()?);
    }

    Ok(())
}
