use clap::Subcommand;

use kensui_core::session::credentials;
use kensui_core::Config;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store an already-issued account id and token
    Login {
        /// Account id from the identity provider
        #[arg(long)]
        account: String,
        /// Id token for the remote store; kept in the OS keyring
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the account and its token; back to guest
    Logout,
    /// Show the sign-in state
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { account, token } => {
            let mut config = Config::load()?;
            config.set("account_id", &account)?;
            if let Some(token) = token {
                credentials::set_token(&token)?;
            }
            println!("signed in as {account}");
        }
        AuthAction::Logout => {
            let mut config = Config::load()?;
            config.set("account_id", "")?;
            credentials::clear_token()?;
            println!("signed out");
        }
        AuthAction::Status => {
            let config = Config::load()?;
            match config.account() {
                Some(account) => {
                    let token = match credentials::get_token() {
                        Ok(Some(_)) => "token stored",
                        Ok(None) => "no token stored",
                        Err(_) => "keyring unavailable",
                    };
                    println!("signed in as {account} ({token})");
                }
                None => println!("guest"),
            }
        }
    }
    Ok(())
}
