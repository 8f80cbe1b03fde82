//! bgeo CLI - writes `.bgeo` files from a JSON scene description.

mod scene;

use std::env;
use std::path::Path;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bgeo::{write_file, Converter, WriteOptions};
use scene::Scene;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut write_index = false;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "--index" => write_index = true,
            _ => filtered_args.push(arg),
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let converter = Converter::with_options(WriteOptions::new().with_index(write_index));

    let result = match filtered_args[0] {
        "pack" | "p" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: bgeo-cli pack <scene.json> <out.bgeo>");
                std::process::exit(1);
            }
            cmd_pack(&converter, filtered_args[1], filtered_args[2])
        }

        "convert" | "c" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: bgeo-cli convert <scene.json> <out.bgeo> [object]");
                std::process::exit(1);
            }
            cmd_convert(&converter, filtered_args[1], filtered_args[2], filtered_args.get(3).copied())
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!("bgeo-cli - Houdini geometry writer");
    println!();
    println!("USAGE:");
    println!("    bgeo-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    p, pack    <scene.json> <out>            Pack every object into one file");
    println!("    c, convert <scene.json> <out> [object]   Write a single object unpacked");
    println!("    h, help                                  Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!("    --index          Write the legacy index section");
    println!();
    println!("NOTES:");
    println!("    - RUST_LOG overrides the verbosity flags");
    println!("    - Compressed .bgeo.sc output is not supported");
}

fn load_scene(path: &str) -> Result<Scene, Box<dyn std::error::Error>> {
    info!("Reading scene: {}", path);
    let text = std::fs::read_to_string(path)?;
    let scene: Scene = serde_json::from_str(&text)?;
    debug!("Scene has {} object(s)", scene.objects.len());
    Ok(scene)
}

fn cmd_pack(converter: &Converter, input: &str, output: &str) -> Result<(), Box<dyn std::error::Error>> {
    if bgeo::util::is_compressed_path(Path::new(output)) {
        return Err(bgeo::Error::CompressionUnavailable(output.into()).into());
    }
    let scene = load_scene(input)?;

    let mut packed = Vec::with_capacity(scene.objects.len());
    for (i, object) in scene.objects.iter().enumerate() {
        let unit = object.to_unit()?;
        let bgeo = converter.convert(&unit)?;
        debug!("{} [{}]: {} bytes", object.name, object.type_name, bgeo.len());
        packed.push(object.packed(i as u64 + 1, bgeo));
    }

    let data = converter.pack(&packed)?;
    write_file(output, &data)?;
    info!("Wrote {} packed object(s) to {}", packed.len(), output);
    Ok(())
}

fn cmd_convert(
    converter: &Converter,
    input: &str,
    output: &str,
    object: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if bgeo::util::is_compressed_path(Path::new(output)) {
        return Err(bgeo::Error::CompressionUnavailable(output.into()).into());
    }
    let scene = load_scene(input)?;

    let found = match object {
        Some(name) => scene.objects.iter().find(|o| o.name == name),
        None => scene.objects.first(),
    };
    let Some(found) = found else {
        return Err(format!("object not found: {}", object.unwrap_or("<first>")).into());
    };

    let data = converter.convert(&found.to_unit()?)?;
    write_file(output, &data)?;
    info!("Wrote {} to {}", found.name, output);
    Ok(())
}
