use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a scene JSON.
    Validate(ValidateArgs),
    /// Run a headless session with a linear scroll ramp and dump the stage.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated duration in seconds (60 fps).
    #[arg(long, default_value_t = 8.0)]
    seconds: f64,

    /// Scroll speed in document pixels per second.
    #[arg(long, default_value_t = 400.0)]
    scroll_speed: f64,

    /// Viewport width.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_scene(path: &PathBuf) -> anyhow::Result<scrollweave::Scene> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: scrollweave::Scene =
        serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    scene.validate()?;
    Ok(scene)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    read_scene(&args.in_path)?;
    eprintln!("ok: {}", args.in_path.display());
    Ok(())
}

struct CountingSurface {
    circles: u64,
}

impl scrollweave::Surface for CountingSurface {
    fn clear(&mut self) {}
    fn fill_circle(&mut self, _center: scrollweave::Point, _radius: f64, _color: scrollweave::Rgba8) {
        self.circles += 1;
    }
}

/// Stack the scene's sections into a synthetic document so triggers have
/// geometry to react to: origins starts one viewport down, showcase after
/// it, each 1.6 viewports tall, with the cards side by side inside the
/// showcase.
fn apply_synthetic_layout(page: &mut scrollweave::Page, scene: &scrollweave::Scene) {
    let vw = page.viewport().width;
    let vh = page.viewport().height;
    let origins_top = vh;
    let origins_bot = origins_top + 1.6 * vh;
    let showcase_bot = origins_bot + 1.6 * vh;
    let doc_bot = showcase_bot + vh;

    page.set_layout(
        &scene.showcase.surfaces[0],
        scrollweave::Rect::new(0.0, 0.0, vw, doc_bot),
    );
    page.set_layout(
        &scene.origins.key,
        scrollweave::Rect::new(0.0, origins_top, vw, origins_bot),
    );
    page.set_layout(
        &scene.showcase.key,
        scrollweave::Rect::new(0.0, origins_bot, vw, showcase_bot),
    );

    let card_w = vw / (scene.showcase.cards.len() as f64);
    for (i, card) in scene.showcase.cards.iter().enumerate() {
        let x0 = i as f64 * card_w;
        page.set_layout(
            &card.key,
            scrollweave::Rect::new(x0, origins_bot + 100.0, x0 + card_w, origins_bot + 500.0),
        );
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let viewport = scrollweave::Viewport::new(args.width, args.height)?;
    let mut page = scrollweave::Page::new(&scene, viewport)?;
    apply_synthetic_layout(&mut page, &scene);

    let mut surface = CountingSurface { circles: 0 };
    let dt = 1.0 / 60.0;
    let frames = (args.seconds / dt).round().max(0.0) as u64;
    for frame in 0..frames {
        let t = frame as f64 * dt;
        page.on_scroll(t * args.scroll_speed)?;
        page.frame(dt, &mut surface)?;
    }

    let dump = serde_json::json!({
        "seconds": page.now(),
        "scroll": page.scroll(),
        "particle_draws": surface.circles,
        "stage": page.stage().snapshot(),
    });
    let text = serde_json::to_string_pretty(&dump)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
