use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nn_visualizer_3d::config::PLOTLY_JS_CDN;
use nn_visualizer_3d::{
    FileModelLoader, HtmlRenderer, SceneStyle, Visualizer, demo, status_message,
};

/// Without a subcommand the window opens.
#[derive(Parser, Debug)]
#[command(
    name = "nn-visualizer-3d",
    version,
    about = "Render the dense layers of a trained model as an interactive 3D HTML scene."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the visualization of a model file without opening the window
    Render(RenderArgs),
    /// Write a small dense model with random weights
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Model file (.json or .keras)
    pub model: PathBuf,

    /// Output file; defaults to <model dir>/downloads/neural_network_3d_<model>.html
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file overriding scene colours, sizes and camera
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// Load plotly.js from its CDN instead of embedding the offline viewer
    #[arg(long)]
    pub plotly_cdn: bool,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    #[arg(short, long, default_value = "modeltest.json")]
    pub output: PathBuf,

    /// Neurons per dense layer
    #[arg(long, value_delimiter = ',', default_values_t = [2usize, 3, 4])]
    pub sizes: Vec<usize>,

    /// Width of the input the first layer is connected to
    #[arg(long, default_value_t = 4)]
    pub input_dim: usize,

    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            None => crate::app::run(),
            Some(Commands::Render(args)) => run_render(args),
            Some(Commands::Demo(args)) => run_demo(args),
        }
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let mut style = match &args.style {
        Some(path) => SceneStyle::load_json(path)
            .with_context(|| format!("loading style {}", path.display()))?,
        None => SceneStyle::default(),
    };
    if args.plotly_cdn {
        style.plotly_js_src = Some(PLOTLY_JS_CDN.to_string());
    }
    let visualizer = Visualizer::new(FileModelLoader, HtmlRenderer, style);
    let result = match &args.output {
        Some(output) => visualizer.visualize(&args.model, output),
        None => visualizer.visualize_to_downloads(&args.model),
    };
    if result.is_ok() {
        println!("{}", status_message(&result));
    }
    result
        .map(|_| ())
        .with_context(|| format!("visualizing {}", args.model.display()))
}

fn run_demo(args: DemoArgs) -> Result<()> {
    anyhow::ensure!(!args.sizes.is_empty(), "at least one layer size is required");
    let model = demo::demo_model(&args.sizes, args.input_dim, args.seed);
    model
        .save_json(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Demo model saved: {}", args.output.display());
    Ok(())
}
