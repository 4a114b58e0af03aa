//! classbench - ONNX Runtime Image Classifier Benchmark

use clap::Parser;
use clap::error::ErrorKind;
use std::process;
use classbench::onnx::{BenchmarkEngine, ClassifierSession, ModelMetadata};
use classbench::processing::{postprocessor, read_input};
use classbench::{init_logging, Args, BenchError, Config, Result};

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(-1);
            }
        },
    };

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        match e {
            BenchError::UnsupportedProvider(_) => eprintln!("{}", e),
            _ => eprintln!("Error: {}", e),
        }
        process::exit(e.exit_code());
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args_and_config(args)?;

    if config.verbose() {
        println!("{}", classbench::get_library_info());
        println!();
    }

    let metadata = ModelMetadata::from_path(config.model_path())?;

    if !config.input_path.exists() {
        return Err(BenchError::config(format!(
            "Input file does not exist: {}", config.input_path.display()
        )));
    }

    let session = ClassifierSession::new(config.model_path(), &config.session_config())?;
    for warning in session.signature_warnings() {
        eprintln!("{}", warning);
    }

    if config.verbose() {
        metadata.print();
        session.session_info().print();
        println!();
    }

    let input = read_input(&config.input_path)?.into_array()?;

    let mut engine = BenchmarkEngine::new(session, config.benchmark_config());
    engine.warm_up(&input)?;
    let result = engine.run(&input)?;

    result.print();
    postprocessor::print_prediction(&result.output, config.top_k());

    Ok(())
}
