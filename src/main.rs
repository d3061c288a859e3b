mod app;
mod tui;
mod ui;

use app::App;
use dotglobe::animation::{self, AnimationCommand, AnimationEvent};
use dotglobe::config::Config;
use std::error::Error;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    init_logging(&config)?;
    info!(?config, "starting dotglobe");

    let mut terminal = tui::init()?;
    let mut app = App::new(&config);

    let (cmd_sender, cmd_receiver) = mpsc::channel(8);
    let (event_sender, mut event_receiver) = mpsc::channel(4);

    let driver = animation::start_animation(
        config.frame_interval,
        config.rotation_period,
        cmd_receiver,
        event_sender,
    );

    let res = run_app(&mut terminal, &mut app, &mut event_receiver, &cmd_sender).await;

    tui::restore()?;
    drop(cmd_sender);
    driver.await?;
    res?;
    Ok(())
}

// stdout belongs to the terminal UI, so logs only go to a file when one is configured
fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

async fn run_app(
    terminal: &mut tui::Tui,
    app: &mut App,
    event_receiver: &mut mpsc::Receiver<AnimationEvent>,
    cmd_sender: &mpsc::Sender<AnimationCommand>,
) -> io::Result<()> {
    let mut needs_render = true;

    while !app.should_quit {
        if needs_render {
            terminal.draw(|f| ui::render(f, app))?;
            needs_render = false;
        }

        // Process animation frames non-blocking
        while let Ok(event) = event_receiver.try_recv() {
            app.handle_animation_event(event);
            needs_render = true;
        }

        if crossterm::event::poll(Duration::from_millis(10))? {
            app.handle_events(cmd_sender)?;
            needs_render = true; // Input might change state
        } else {
            // Yield so the animation driver gets to run between polls
            tokio::task::yield_now().await;
        }
    }
    Ok(())
}
