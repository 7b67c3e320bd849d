use cityroads::errors::{RoadgenError, RoadgenResult};

fn invalid(reason: String) -> RoadgenError {
    RoadgenError::InvalidConfig { reason }
}

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> RoadgenResult<[T; N]>
where
    T: Copy + Default + std::str::FromStr,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(invalid(format!(
            "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
        )));
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = part
            .trim()
            .parse()
            .map_err(|_| invalid(format!("Invalid {type_name} value: '{part}'")))?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation, returning (width, height)
pub fn parse_size(size_str: &str) -> RoadgenResult<(usize, usize)> {
    let [width, height] = parse_delimited::<usize, 2>(size_str, 'x', "size")?;

    if width == 0 || height == 0 {
        return Err(invalid("Width and height must be greater than 0".to_string()));
    }

    if width > 4096 || height > 4096 {
        return Err(invalid("Width and height must not exceed 4096".to_string()));
    }

    Ok((width, height))
}

/// Parse quantile string "Q1,Q2,Q3"; ordering is checked with the rest of the config
pub fn parse_quantiles(quantiles_str: &str) -> RoadgenResult<[f32; 3]> {
    parse_delimited::<f32, 3>(quantiles_str, ',', "quantiles")
}
