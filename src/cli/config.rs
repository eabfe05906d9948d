use crate::cli::global::{GlobalArgs, InputFormat};
use bitlab::workspace::{FileFormat, parse_content};
use bitlab::{BitString, Config};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Load configuration layers plus `--config`.
pub fn load_config(global: &GlobalArgs) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load_with_overrides(global.config.as_deref())?)
}

pub fn file_format(global: &GlobalArgs) -> Option<FileFormat> {
    match global.format {
        InputFormat::Auto => None,
        InputFormat::Text => Some(FileFormat::Text),
        InputFormat::Binary => Some(FileFormat::Binary),
    }
}

/// Read a file or stdin, enforcing `--max-size`.
pub fn read_input(
    file: Option<&Path>,
    global: &GlobalArgs,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if let Some(file_path) = file {
        // Check file size if max_size is set
        if global.max_size > 0 {
            let file_size = fs::metadata(file_path)?.len() as usize;

            if file_size > global.max_size {
                if global.force {
                    if !global.quiet {
                        eprintln!(
                            "Warning: Processing large file ({} bytes, limit: {} bytes)",
                            file_size, global.max_size
                        );
                    }
                } else {
                    return Err(format!(
                        "File size ({} bytes) exceeds limit ({} bytes). Use --force to process anyway.",
                        file_size, global.max_size
                    )
                    .into());
                }
            }
        }

        Ok(fs::read(file_path)?)
    } else {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;

        // Check stdin size after reading
        if global.max_size > 0 && buffer.len() > global.max_size && !global.force {
            return Err(format!(
                "Input size ({} bytes) exceeds maximum ({} bytes). Use --force to process anyway.",
                buffer.len(),
                global.max_size
            )
            .into());
        }

        Ok(buffer)
    }
}

/// Read bits from a file or stdin using `--format`.
pub fn read_bits(
    file: Option<&Path>,
    global: &GlobalArgs,
) -> Result<BitString, Box<dyn std::error::Error>> {
    let content = read_input(file, global)?;
    let (bits, format) = parse_content(&content, file_format(global))?;
    log::debug!("read {} bits as {:?}", bits.len(), format);
    Ok(bits)
}

/// Write bits as text (or packed bytes with `--raw`) to a file or stdout.
pub fn write_bits(
    bits: &BitString,
    output: Option<&Path>,
    global: &GlobalArgs,
    group: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = if global.raw {
        if bits.len() % 8 != 0 && !global.quiet {
            eprintln!(
                "Warning: {} bits padded to {} bytes",
                bits.len(),
                bits.len().div_ceil(8)
            );
        }
        bits.to_bytes()
    } else {
        let text = match group {
            Some(n) if n > 0 => bits.grouped(n),
            _ => bits.to_string(),
        };
        format!("{}\n", text).into_bytes()
    };

    match output {
        Some(path) => fs::write(path, data)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Parse a decimal or `0x` hexadecimal integer.
pub fn parse_u32(s: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let s = s.trim();
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16)?,
        None => s.parse()?,
    };
    Ok(value)
}
