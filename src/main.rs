use catmeta::{MetadataScanner, NativeTrustListStore, ScanConfig};
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <catalog file or folder>", args[0]);
        std::process::exit(1);
    }

    let config = match ScanConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Quoted paths pasted from Explorer keep their quotes
    let path = args[1].trim().trim_matches('"');
    let scanner = MetadataScanner::new(config, NativeTrustListStore::default());

    match scanner.scan_path(Path::new(path)) {
        Ok((reports, summary)) => {
            for report in &reports {
                print!("{report}");
                println!("{}", "-".repeat(90));
            }
            println!("Done. {summary}");
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
