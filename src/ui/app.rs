// Exchange Application
// Runs two key pairs through encrypt, sign, verify and decrypt and reports each step

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::cli::{Cli, Command};
use super::input::{ExchangeForm, KeyForm};
use crate::rsa::{verify, CharwiseScheme, KeyPair, LetterScheme, MessageScheme, PublicKey};
use crate::util::format_cipher;

/// Settings for a transcript run
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub show_keys: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { show_keys: true }
    }
}

impl AppConfig {
    pub fn with_show_keys(mut self, show: bool) -> Self {
        self.show_keys = show;
        self
    }
}

impl From<&Cli> for AppConfig {
    fn from(cli: &Cli) -> Self {
        AppConfig::default().with_show_keys(!cli.no_keys)
    }
}

/// One message exchange between Computer One (sender, signer) and
/// Computer Two (recipient, verifier).
pub struct Session {
    scheme: Box<dyn MessageScheme>,
    config: AppConfig,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            scheme: Box::new(CharwiseScheme),
            config,
        }
    }

    pub fn with_scheme(mut self, scheme: Box<dyn MessageScheme>) -> Self {
        self.scheme = scheme;
        self
    }

    /// Encrypt for Computer Two, sign as Computer One, verify, decrypt, and
    /// return the transcript lines in that order.
    pub fn run(
        &self,
        message: &str,
        computer_one: &KeyPair,
        computer_two: &KeyPair,
    ) -> anyhow::Result<Vec<String>> {
        let mut transcript = Vec::new();

        transcript.push(format!(
            "Encrypting message with Computer Two's public keys: {}",
            message
        ));
        let encrypted = self.scheme.encrypt(message, &computer_two.public_key());
        let formatted = format_cipher(&encrypted);
        transcript.push(format!("Encrypted message: {}", formatted));

        transcript.push(format!("Computer One is signing: {}", message));
        let signature = computer_one.sign(message);
        log::debug!("signature = {}", signature);

        transcript.push("Computer Two has received the encrypted message.".to_string());

        let signer = computer_one.public_key();
        let verified = verify(message, &signature, &signer);
        transcript.push(format!(
            "Computer Two is verifying the signature using Computer One's public keys: ({}, {}) Verify status: {}",
            signer.public_modulus(),
            signer.public_exponent(),
            verified
        ));

        let decrypted = self
            .scheme
            .decrypt(&encrypted, computer_two)
            .context("Computer Two could not decrypt the message")?;
        transcript.push(format!(
            "Computer Two is decrypting using its private key: {} -> {}",
            formatted, decrypted
        ));

        if self.config.show_keys {
            transcript.push(format!("Computer One: {}", computer_one));
            transcript.push(format!("Computer Two: {}", computer_two));
        }

        Ok(transcript)
    }
}

/// Ask for the message on stdin, as the message dialog did
fn prompt_message() -> anyhow::Result<String> {
    eprint!("Enter your message: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn message_or_prompt(message: Option<String>) -> anyhow::Result<String> {
    match message {
        Some(message) => Ok(message),
        None => prompt_message(),
    }
}

pub fn create_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from(&cli);
    let letters = cli.letters;

    let (computer_one, computer_two, message) = match cli.command {
        Command::Exchange {
            p,
            q,
            e,
            p2,
            q2,
            e2,
            message,
        } => {
            let form = ExchangeForm::new(KeyForm::new(p, q, e), KeyForm::new(p2, q2, e2));
            let (one, two) = form.validate()?;
            (one, two, message_or_prompt(message)?)
        }
        Command::Random {
            lo,
            hi,
            seed,
            message,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let one = KeyPair::generate(lo, hi, &mut rng).context("Computer One")?;
            let two = KeyPair::generate(lo, hi, &mut rng).context("Computer Two")?;
            (one, two, message_or_prompt(message)?)
        }
    };

    log::info!(
        "key pairs ready: {}-bit and {}-bit moduli",
        computer_one.bit_length(),
        computer_two.bit_length()
    );

    let mut session = Session::new(config);
    if letters {
        session = session.with_scheme(Box::new(LetterScheme));
    }
    let transcript = session.run(&message, &computer_one, &computer_two)?;
    for line in transcript {
        println!("{}", line);
    }

    Ok(())
}
