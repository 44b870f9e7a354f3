mod log;

use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tls_sig::{Credentials, DEFAULT_EXPIRE, RoomPrivilege, SecretKey, TokenService, privilege};

#[derive(Parser, Debug)]
#[command(name = "tls-sig", version, about = "Generate and verify UserSig tokens")]
pub struct Cli {
    #[command(flatten)]
    log: log::Log,

    #[command(flatten)]
    app: AppArgs,

    #[command(subcommand)]
    command: Command,
}

/// Application credentials shared with the backend.
#[derive(Args, Debug)]
pub struct AppArgs {
    /// The application id.
    #[arg(long, global = true, env = "TLS_SIG_SDKAPPID")]
    sdkappid: Option<u64>,

    /// The secret key issued for the application.
    #[arg(long, global = true, env = "TLS_SIG_KEY", hide_env_values = true)]
    key: Option<String>,
}

impl AppArgs {
    fn service(&self) -> anyhow::Result<TokenService> {
        let sdkappid = self
            .sdkappid
            .context("missing --sdkappid (or TLS_SIG_SDKAPPID)")?;
        let key = self.key.as_deref().context("missing --key (or TLS_SIG_KEY)")?;

        Ok(TokenService::new(Credentials::new(sdkappid, key)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a token and print it to stdout.
    Generate {
        /// The account identifier to sign for.
        #[arg(long)]
        identifier: String,

        /// Lifetime in seconds.
        #[arg(long, default_value_t = DEFAULT_EXPIRE.as_secs())]
        expire: u64,

        /// Restrict the token to a numeric room id.
        #[arg(long, conflicts_with = "room_str")]
        room_id: Option<u32>,

        /// Restrict the token to a string room id.
        #[arg(long)]
        room_str: Option<String>,

        /// Permission bitmask for the room.
        #[arg(long, default_value_t = privilege::ALL)]
        privilege_map: u32,
    },

    /// Verify a token and print its contents.
    Verify {
        /// The account identifier the token must belong to.
        #[arg(long)]
        identifier: String,

        /// The token to verify; read from stdin when omitted.
        #[arg(long)]
        token: Option<String>,
    },

    /// Print a fresh random secret key.
    Keygen,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.log.init();

    match cli.command {
        Command::Generate {
            identifier,
            expire,
            room_id,
            room_str,
            privilege_map,
        } => {
            let service = cli.app.service()?;
            let expire = Duration::from_secs(expire);
            let room = match (room_id, room_str) {
                (Some(id), _) => Some(RoomPrivilege::numeric(id, privilege_map)),
                (None, Some(name)) => Some(RoomPrivilege::named(name, privilege_map)),
                (None, None) => None,
            };

            let token = match room {
                Some(room) => service.generate_with_privilege(&identifier, expire, &room)?,
                None => service.generate_with_expire(&identifier, expire)?,
            };
            println!("{token}");
        }
        Command::Verify { identifier, token } => {
            let service = cli.app.service()?;
            let token = match token {
                Some(token) => token,
                None => {
                    let mut input = String::new();
                    std::io::stdin()
                        .read_to_string(&mut input)
                        .context("failed to read token from stdin")?;
                    input
                }
            };

            let verified = service.verify(token.trim(), &identifier)?;
            println!("issued_at: {}", verified.issued_at);
            println!("expire: {}", verified.expire);
            println!("expires_at: {}", verified.expires_at());

            if let Some(record) = verified.privilege()? {
                println!("room: {}", record.room);
                println!("privilege_map: {:#04x}", record.privilege_map);
                println!("privilege_expire_at: {}", record.expire_at);
            }
        }
        Command::Keygen => {
            let key = SecretKey::generate();
            println!("{}", std::str::from_utf8(key.as_bytes())?);
        }
    }

    Ok(())
}
