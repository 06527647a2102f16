use flipbook::{
    cli::Cli,
    config::Config,
    dump,
    loader,
    logging::{self, LogLevel},
    models::Poem,
    paginator::{PagePolicy, paginate_book},
    settings::Settings,
    ui::reader::Reader,
};

use clap::Parser;
use crossterm::tty::IsTty;
use eyre::Result;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogLevel::from_verbosity(cli.verbose, cli.debug));

    let mut config = load_config(&cli);
    apply_cli_overrides(&mut config.settings, &cli);

    let (source, files) = loader::source_from_settings(&config.settings)?;
    let poems = loader::load_poems(source.as_ref(), &files);

    if cli.dump {
        dump_content(&config, &poems);
        Ok(())
    } else {
        run_tui(config, poems)
    }
}

fn load_config(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path.clone()),
        None => Config::new(),
    };
    match loaded {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Could not load configuration: {}", err);
            log::warn!("Starting with default settings");
            Config::in_memory(Settings::default())
        }
    }
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(dir) = &cli.dir {
        settings.poems_dir = dir.display().to_string();
        settings.base_url = None;
    }
    if let Some(base_url) = &cli.base_url {
        settings.base_url = Some(base_url.clone());
    }
    if !cli.poems.is_empty() {
        settings.poem_files = cli.poems.clone();
    }
    if let Some(layout) = cli.layout {
        settings.layout = layout;
    }
}

fn dump_content(config: &Config, poems: &[Poem]) {
    let settings = &config.settings;
    let term_width = if io::stdout().is_tty() {
        crossterm::terminal::size().map(|(w, _)| w).ok()
    } else {
        None
    };
    let layout = dump::dump_layout(settings.layout, term_width, settings.spread_min_width);
    let book = paginate_book(
        poems,
        &PagePolicy::for_layout(layout, settings),
        &settings.book_title,
    );
    print!("{}", dump::book_to_text(&book));
}

fn run_tui(config: Config, poems: Vec<Poem>) -> Result<()> {
    let mut reader = Reader::new(config, poems)?;
    reader.run()
}
