//! Terminal front-end: routes parsed input to the HTTP client, the saved
//! session and the chat client

use crate::commands::{Input, HELP};
use crate::display::render_products;
use petshop_core::Error;
use petshop_engine::ChatClientHandle;
use petshop_networking::api::{fetch_products, login_user, register_user};
use petshop_networking::PetShopClient;
use petshop_persistence::{sqlite, Database};
use std::ops::ControlFlow;
use tracing::{error, warn};

pub struct App {
    http: PetShopClient,
    db: Option<Database>,
    chat: ChatClientHandle,
}

impl App {
    pub fn new(http: PetShopClient, db: Option<Database>, chat: ChatClientHandle) -> Self {
        Self { http, db, chat }
    }

    pub async fn handle(&mut self, input: Input) -> ControlFlow<()> {
        match input {
            Input::Chat(text) => self.send_chat(&text).await,
            Input::Products(category) => self.show_products(category.as_deref()).await,
            Input::Login { username, password } => self.login(&username, &password).await,
            Input::Register {
                username,
                email,
                password,
            } => self.register(&username, &email, &password).await,
            Input::Logout => self.logout().await,
            Input::Reconnect => {
                if let Err(e) = self.chat.connect().await {
                    error!("Reconnect request failed: {}", e);
                }
            }
            Input::Status => match self.chat.status().await {
                Ok(status) => println!(
                    "Chat: {}  User: {}",
                    status.connection.as_str(),
                    status.identity.as_deref().unwrap_or("(not logged in)")
                ),
                Err(e) => error!("Status request failed: {}", e),
            },
            Input::Help => println!("{}", HELP),
            Input::Quit => return ControlFlow::Break(()),
            Input::Usage(usage) => println!("Usage: {}", usage),
            Input::Unknown(name) => println!("Unknown command /{} (try /help)", name),
        }
        ControlFlow::Continue(())
    }

    pub async fn show_products(&self, category: Option<&str>) {
        match fetch_products(&self.http, category).await {
            Ok(products) => println!("{}", render_products(&products)),
            Err(e) => {
                error!("Failed to load products: {}", e);
                println!("Could not load products. Try again later.");
            }
        }
    }

    async fn send_chat(&self, text: &str) {
        match self.chat.send(text).await {
            Ok(_) => {}
            // Stands in for the blocking prompt a browser would show
            Err(Error::NotAuthenticated) => {
                eprintln!("\n*** Please log in to send messages (/login <username> <password>) ***\n");
            }
            // Already surfaced as a notice by the gate
            Err(Error::NotConnected) | Err(Error::TransmissionFailed(_)) => {}
            Err(e) => error!("Chat send failed: {}", e),
        }
    }

    async fn login(&mut self, username: &str, password: &str) {
        let login = match login_user(&self.http, username, password).await {
            Ok(login) => login,
            Err(e) => {
                println!("Error: {}", e);
                return;
            }
        };

        let identity = login.username.unwrap_or_else(|| username.to_string());

        if let Some(db) = &self.db {
            if let Err(e) = sqlite::save_login(db.pool(), &identity, &login.access_token).await {
                warn!("Login not persisted: {}", e);
            }
        }

        println!("Logged in as {}", identity);
        if let Err(e) = self.chat.login(&identity).await {
            error!("Chat login failed: {}", e);
        }
    }

    async fn register(&self, username: &str, email: &str, password: &str) {
        match register_user(&self.http, username, email, password).await {
            Ok(_) => println!("Registration successful! Now log in with /login."),
            Err(e) => println!("Error: {}", e),
        }
    }

    async fn logout(&mut self) {
        if let Some(db) = &self.db {
            if let Err(e) = sqlite::clear_login(db.pool()).await {
                warn!("Saved login not cleared: {}", e);
            }
        }
        if let Err(e) = self.chat.logout().await {
            error!("Chat logout failed: {}", e);
        }
    }
}
