//! Config command for printing the effective configuration.

use std::io::Write;

use anyhow::Result;

use crate::Config;

/// Writes the merged configuration as pretty JSON.
pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    writeln!(writer, "{}", serde_json::to_string_pretty(config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn config_command_outputs_defaults() {
        let mut output = Vec::new();
        run(&mut output, &Config::default()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r#"
        {
          "estimator": {
            "break_threshold_secs": 3600,
            "fallback_session_secs": 1800,
            "trailing_extrapolation": true
          },
          "offset_mode": "discard",
          "all_refs": true
        }
        "#);
    }
}
