use castsvg::runner::{run_render, RunnerError};
use castsvg::ui::{MessageBlock, MessageRenderer, OutputMode, PlainRenderer};
use castsvg::{parse_command, print_usage, version_text, Command};

fn main() {
    castsvg::logging::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output_mode = OutputMode::from_env();
    let cmd = match parse_command(args) {
        Ok(cmd) => cmd,
        Err(err) => {
            let mut renderer = PlainRenderer::stderr(output_mode);
            let _ = renderer.error_block(
                &MessageBlock::new("Invalid command arguments", err.to_string())
                    .with_hint("Run `castsvg --help` to see supported arguments"),
            );
            print_usage();
            std::process::exit(2);
        }
    };

    match cmd {
        Command::Help => {
            print_usage();
        }
        Command::Version => {
            println!("{}", version_text());
        }
        Command::Render(args) => match run_render(&args, std::io::stdin().lock()) {
            Ok(output) => {
                if !output.warnings.is_empty() {
                    let mut renderer = PlainRenderer::stderr(output_mode);
                    for warning in &output.warnings {
                        let _ = renderer.warning(warning);
                    }
                }
                println!("{}", output.document);
            }
            Err(err) => {
                let mut renderer = PlainRenderer::stderr(output_mode);
                let _ = renderer
                    .error_block(&MessageBlock::new(error_title(&err), err.to_string()));
                if err.is_usage_error() {
                    print_usage();
                }
                std::process::exit(1);
            }
        },
    }
}

fn error_title(err: &RunnerError) -> &'static str {
    match err {
        RunnerError::MissingInput | RunnerError::Session(_) => "Invalid recording",
        RunnerError::Input(_) | RunnerError::InputFile { .. } => "Input unavailable",
        RunnerError::Config(_) => "Invalid config",
        RunnerError::Render(_) => "Render failed",
    }
}
