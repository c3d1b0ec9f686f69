use std::io;

use image_to_ico::action::cli::process_args;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let message = process_args(args)?;
    log::info!("程式執行完成");
    println!("{}", message);
    Ok(())
}
