use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use wemark_lib::themes::ThemeManager;
use wemark_lib::{convert, markdown};

#[derive(Parser)]
#[command(name = "wemark")]
#[command(about = "Render Markdown into WeChat-ready inline-styled HTML")]
struct Args {
    /// Input Markdown file.
    input: PathBuf,

    /// Output HTML file.
    output: PathBuf,

    /// Theme to apply (built-in or custom).
    #[arg(long, default_value = "minimalist")]
    theme: String,

    /// Directory of custom .css themes.
    #[arg(long)]
    theme_dir: Option<PathBuf>,

    /// Extra CSS file applied after the theme.
    #[arg(long)]
    css: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args: Args = Args::parse();

    let mut themes = ThemeManager::with_builtin_themes();
    if let Some(dir) = &args.theme_dir {
        if let Err(e) = themes.load_custom_dir(dir) {
            eprintln!("Error loading custom themes: {}", e);
            process::exit(1);
        }
    }

    let Some(theme) = themes.get(&args.theme) else {
        let available: Vec<&str> = themes.all().map(|t| t.id.as_str()).collect();
        eprintln!(
            "Unknown theme \"{}\". Available: {}",
            args.theme,
            available.join(", ")
        );
        process::exit(1);
    };

    let mut css = theme.css.clone();
    if let Some(path) = &args.css {
        match fs::read_to_string(path) {
            Ok(extra) => {
                css.push('\n');
                css.push_str(&extra);
            }
            Err(e) => {
                eprintln!("Error reading CSS file: {}", e);
                process::exit(1);
            }
        }
    }

    match fs::read_to_string(&args.input) {
        Ok(text) => {
            let html = markdown::render(&text);
            let styled = convert(&html, &css);
            if let Err(e) = fs::write(&args.output, styled) {
                eprintln!("Error writing output file: {}", e);
                process::exit(1);
            }
            println!("Wrote {}", args.output.display());
        }
        Err(e) => {
            eprintln!("Error reading Markdown file: {}", e);
            process::exit(1);
        }
    }
}
