use crate::errors::{TerrainError, TerrainResult};
use crate::terrain::coordinates::GridCell;
use std::path::Path;

/// Largest grid edge accepted from the command line
pub const MAX_GRID_EDGE: u32 = 4096;

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> TerrainResult<[T; N]>
where
    T: Copy + Default + std::str::FromStr,
{
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(TerrainError::InvalidArgument {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = part.parse().map_err(|_| TerrainError::InvalidArgument {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> TerrainResult<(u32, u32)> {
    let [width, height] = parse_delimited::<u32, 2>(size_str, 'x', "size")?;

    if width == 0 || height == 0 {
        return Err(TerrainError::InvalidArgument {
            reason: "Width and height must be greater than 0".to_string(),
        });
    }

    if width > MAX_GRID_EDGE || height > MAX_GRID_EDGE {
        return Err(TerrainError::InvalidArgument {
            reason: format!("Width and height must not exceed {MAX_GRID_EDGE}"),
        });
    }

    Ok((width, height))
}

/// Parse cell string "X,Y"
pub fn parse_cell(cell_str: &str) -> TerrainResult<GridCell> {
    let [x, y] = parse_delimited::<i32, 2>(cell_str, ',', "cell")?;
    Ok(GridCell::new(x, y))
}

/// Reject output paths that try to escape the working directory
pub fn validate_output_path(filename: &str) -> TerrainResult<()> {
    let path = Path::new(filename);
    if path.is_absolute() {
        return Err(TerrainError::InvalidArgument {
            reason: format!("Output path must be relative, got absolute path: {filename}"),
        });
    }

    if path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(TerrainError::InvalidArgument {
            reason: "Output path cannot contain '..'".to_string(),
        });
    }

    Ok(())
}
