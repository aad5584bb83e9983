use meterdial::MeterReader;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <meter_type.json> <photo.jpg> [out.json]", args[0]);
        std::process::exit(2);
    }

    let reader = MeterReader::from_meter_type_json_file(Path::new(&args[1]))?;
    let photo = image::open(&args[2])?.to_rgb8();

    let result = reader.read(&photo)?;
    println!(
        "Reading {} ({} wheels, {} split).",
        result.reading,
        result.groups.len(),
        result.pair_resolutions.len()
    );

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
