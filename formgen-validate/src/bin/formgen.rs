/// CLI: reads a schema JSON from a file or stdin and renders the HTML
/// form to stdout.
///
/// Usage:
///   formgen < schema.json > form.html
///   formgen schema.json > form.html
///   formgen --data data.json --country AU schema.json
use std::io::Read;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut data_path: Option<&str> = None;
    let mut country: Option<&str> = None;
    let mut schema_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-d" => {
                i += 1;
                if i < args.len() {
                    data_path = Some(&args[i]);
                }
            }
            "--country" | "-c" => {
                i += 1;
                if i < args.len() {
                    country = Some(&args[i]);
                }
            }
            "--help" | "-h" => {
                eprintln!("Usage: formgen [--data data.json] [--country CC] [schema.json]");
                eprintln!("  Reads a schema from file or stdin, emits an HTML form to stdout.");
                std::process::exit(0);
            }
            path => {
                schema_path = Some(path);
            }
        }
        i += 1;
    }

    let schema_str = match schema_path {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Cannot read {path}: {e}");
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .unwrap_or_else(|e| {
                    eprintln!("Cannot read stdin: {e}");
                    std::process::exit(1);
                });
            buf
        }
    };

    let schema_json: serde_json::Value = serde_json::from_str(&schema_str).unwrap_or_else(|e| {
        eprintln!("Invalid JSON: {e}");
        std::process::exit(1);
    });

    let validator = formgen_validate::BasicValidator::from_json(&schema_json).unwrap_or_else(|e| {
        eprintln!("Invalid schema: {e}");
        std::process::exit(1);
    });

    let initial_data: Option<serde_json::Value> = data_path.map(|path| {
        let data_str = std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Cannot read {path}: {e}");
            std::process::exit(1);
        });
        serde_json::from_str(&data_str).unwrap_or_else(|e| {
            eprintln!("Invalid JSON in {path}: {e}");
            std::process::exit(1);
        })
    });

    let mut options = formgen::FormOptions::default();
    if let Some(cc) = country {
        options.phone.default_country = cc.to_string();
    }

    let controller = formgen::FormController::new(validator, initial_data, options)
        .unwrap_or_else(|e| {
            eprintln!("Cannot build form state: {e}");
            std::process::exit(1);
        });

    let html = controller.render_html().unwrap_or_else(|e| {
        eprintln!("Cannot generate fields: {e}");
        std::process::exit(1);
    });

    print!("{html}");
}
