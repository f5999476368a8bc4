// Command Line Arguments
// The form's fields as clap arguments

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "textbook-rsa", version, about = "Textbook RSA between two computers")]
pub struct Cli {
    /// Leave the key dump out of the transcript
    #[arg(long, global = true)]
    pub no_keys: bool,

    /// Encrypt letters only, by alphabet position (A = 1 ... Z = 26)
    #[arg(long, global = true)]
    pub letters: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Build both keys from the given p, q and e values
    Exchange {
        #[arg(long, allow_hyphen_values = true)]
        p: String,
        #[arg(long, allow_hyphen_values = true)]
        q: String,
        #[arg(long, allow_hyphen_values = true)]
        e: String,
        #[arg(long, allow_hyphen_values = true)]
        p2: String,
        #[arg(long, allow_hyphen_values = true)]
        q2: String,
        #[arg(long, allow_hyphen_values = true)]
        e2: String,

        /// Message to send; read from stdin when omitted
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Generate both keys from random primes in [lo, hi]
    Random {
        #[arg(long, default_value_t = 100)]
        lo: u64,
        #[arg(long, default_value_t = 1000)]
        hi: u64,

        /// Seed for reproducible keys
        #[arg(long, env = "TEXTBOOK_RSA_SEED")]
        seed: Option<u64>,

        /// Message to send; read from stdin when omitted
        #[arg(long, short)]
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exchange() {
        let cli = Cli::try_parse_from([
            "textbook-rsa", "exchange", "--p", "61", "--q", "53", "--e", "17", "--p2", "1009",
            "--q2", "1013", "--e2", "-5", "-m", "hi",
        ])
        .unwrap();

        assert!(!cli.no_keys);
        assert_eq!(
            cli.command,
            Command::Exchange {
                p: "61".into(),
                q: "53".into(),
                e: "17".into(),
                p2: "1009".into(),
                q2: "1013".into(),
                e2: "-5".into(),
                message: Some("hi".into()),
            }
        );
    }

    #[test]
    fn test_parse_random_defaults() {
        let cli = Cli::try_parse_from(["textbook-rsa", "random", "--seed", "3", "--no-keys"]).unwrap();
        assert!(cli.no_keys);
        assert!(!cli.letters);
        assert_eq!(
            cli.command,
            Command::Random {
                lo: 100,
                hi: 1000,
                seed: Some(3),
                message: None,
            }
        );
    }

    #[test]
    fn test_parse_letters_flag() {
        let cli = Cli::try_parse_from(["textbook-rsa", "random", "--letters"]).unwrap();
        assert!(cli.letters);
    }

    #[test]
    fn test_exchange_requires_all_fields() {
        assert!(Cli::try_parse_from(["textbook-rsa", "exchange", "--p", "61"]).is_err());
    }
}
