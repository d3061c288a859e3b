use dotglobe::color::{hsv_to_rgb, parse_hex, Rgba};
use dotglobe::math::clamp;
use std::env;
use std::error::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: colorconv <rrggbb[aa]> | rgb <r> <g> <b> [a] | hsv <h> <s> <v>";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let color = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["rgb", channels @ ..] if channels.len() == 3 || channels.len() == 4 => {
            let mut values = [255u8; 4];
            for (slot, raw) in values.iter_mut().zip(channels.iter()) {
                *slot = clamp(raw.parse::<i32>()?, 0, 255)? as u8;
            }
            Rgba::new(values[0], values[1], values[2], values[3])
        }
        ["hsv", h, s, v] => hsv_to_rgb(h.parse()?, s.parse()?, v.parse()?),
        [hex] => parse_hex(hex)?,
        _ => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    debug!(?color, "parsed input");

    let (h, s, v) = color.to_hsv().rounded();
    println!("hex   #{}", color.to_hex(!color.is_opaque()));
    println!("css   {}", color.rgba_label());
    println!("rgb   {} {} {}", color.red, color.green, color.blue);
    println!("hsv   {h} {s} {v}");
    println!("alpha {}%", color.opacity_percent());
    Ok(())
}
