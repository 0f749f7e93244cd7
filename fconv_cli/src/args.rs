use std::ffi::OsString;

/// Long options that older scripts spell with a single dash, Go `flag` style.
const SINGLE_DASH_LONG: &[&str] = &["timeout"];

/// Rewrites `-timeout 5s` and `-timeout=5s` to `--timeout ...` so clap does
/// not read them as `-t imeout`. Arguments after a bare `--` are untouched.
pub fn normalize<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_single_dash_long(s) => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_LONG.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(args: &[&str]) -> Vec<String> {
        normalize(args.iter().map(OsString::from))
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_rewrites_single_dash_timeout() {
        assert_eq!(
            normalized(&["fconv", "-t", "yml", "-timeout", "5s"]),
            ["fconv", "-t", "yml", "--timeout", "5s"]
        );
        assert_eq!(
            normalized(&["fconv", "-timeout=1ms", "-t", "json"]),
            ["fconv", "--timeout=1ms", "-t", "json"]
        );
    }

    #[test]
    fn test_leaves_other_flags_alone() {
        let args = ["fconv", "-t", "toml", "--timeout", "1s", "-f", "json", "-tyml"];
        assert_eq!(normalized(&args), args);
    }

    #[test]
    fn test_stops_at_separator() {
        assert_eq!(
            normalized(&["fconv", "--", "-timeout"]),
            ["fconv", "--", "-timeout"]
        );
    }
}
