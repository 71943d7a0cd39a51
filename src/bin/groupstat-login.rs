//! 交互式登陆用户账号，生成主程序使用的 session 文件。只需要运行一次。

use std::io::{self, BufRead, Write};

use anyhow::Result;
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use grammers_session::Session;
use groupstat::config::Config;

fn prompt(text: &str) -> Result<String> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new("./config.toml")?;

    let client = Client::connect(ClientConfig {
        session: Session::load_file_or_create(&config.client.session_file)?,
        api_id: config.client.api_id,
        api_hash: config.client.api_hash.clone(),
        params: InitParams::default(),
    })
    .await?;

    if client.is_authorized().await? {
        println!("Session already authorized: {}", config.client.session_file);
        return Ok(());
    }

    let phone = prompt("Enter phone (+countrycode): ")?;
    let token = client.request_login_code(&phone).await?;
    let code = prompt("Enter the code you received: ")?;
    match client.sign_in(&token, &code).await {
        Ok(user) => println!("Logged in as {}", user.full_name()),
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("none").to_string();
            let password = prompt(&format!("Enter 2FA password (hint: {}): ", hint))?;
            let user = client.check_password(password_token, password).await?;
            println!("Logged in as {}", user.full_name());
        }
        Err(err) => return Err(err.into()),
    }

    client.session().save_to_file(&config.client.session_file)?;
    println!("Session saved to {}", config.client.session_file);

    Ok(())
}
