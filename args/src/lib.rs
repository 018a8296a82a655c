use once_cell::sync::Lazy;

macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit($code);
    }};
}

const HELP: &str = "OVERVIEW: Type & function name prettifier

USAGE: prettify [options] [NAME ...]

Prettifies each NAME, or filters stdin line by line when no NAME is given.

OPTIONS:
  -H, --help          Print usage information
  -F, --function      Treat input as function signatures
  -S, --scopes        Print the scope-by-scope decomposition instead";

const ABBRV: &[&str] = &["-H", "-F", "-S"];
const NAMES: &[&str] = &["--help", "--function", "--scopes"];

pub static ARGS: Lazy<Cli> = Lazy::new(Cli::parse);

#[derive(Debug, Clone)]
pub struct Cli {
    /// Parse inputs as function signatures rather than types.
    pub function: bool,

    /// Print scope records rather than the canonical rendering.
    pub scopes: bool,

    /// Names given on the command line; stdin is filtered when empty.
    pub names: Vec<String>,
}

impl Cli {
    pub fn parse() -> Self {
        let mut cli = Cli {
            function: false,
            scopes: false,
            names: Vec::new(),
        };

        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-H" | "--help" => exit!(0 => "{HELP}"),
                "-F" | "--function" => cli.function = true,
                "-S" | "--scopes" => cli.scopes = true,
                unknown if unknown.starts_with('-') => {
                    let mut distance = u32::MAX;
                    let mut best_guess = "";
                    for &name in NAMES.iter().chain(ABBRV) {
                        let d = triple_accel::levenshtein_exp(unknown.as_bytes(), name.as_bytes());
                        if d < distance {
                            distance = d;
                            best_guess = name;
                        }
                    }

                    // A guess that's less than 3 `steps` away from a correct arg.
                    if distance < 4 {
                        exit!(1 => "Unknown cmd arg '{unknown}' did you mean '{best_guess}'?")
                    } else {
                        exit!(1 => "Unknown cmd arg '{unknown}' was entered.");
                    }
                }
                name => cli.names.push(name.to_owned()),
            }
        }

        cli
    }
}
