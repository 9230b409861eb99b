use std::env;
use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

/// Staff tooling for the pre-order server
#[derive(Parser, Debug)]
#[command(name = "preorder")]
#[command(about = "client cli used by restaurant staff to review and close pre-order sessions", version, long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// session admin ops
    #[command(arg_required_else_help = true)]
    Admin(AdminArgs),
    /// print the current menu
    Menu {
        #[arg(long, help = "Order session to open the menu for, server default if absent.")]
        session: Option<String>,
    },
}

#[derive(Debug, Args)]
struct AdminArgs {
    #[arg(long, help = "Order session to operate on.", value_name = "SESSION_ID")]
    session: String,
    #[arg(long, help = "Admin token for the session.", env = "PREORDER_ADMIN_TOKEN", default_value = "")]
    token: String,
    #[command(subcommand)]
    command: AdminCmds,
}

#[derive(Debug, Subcommand)]
enum AdminCmds {
    /// list orders with per person totals
    Orders,
    /// stop accepting orders
    Lock,
    /// accept orders again
    Unlock,
}

const DEFAULT_HOST: &str = "http://localhost:8080";
const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Debug, Deserialize)]
struct AdminOrdersResponse {
    session: Option<SessionInfo>,
    orders: Vec<AdminOrder>,
    totals: AuditTotals,
    grand_total_display: String,
}

#[derive(Debug, Deserialize)]
struct SessionInfo {
    title: String,
    is_locked: bool,
}

#[derive(Debug, Deserialize)]
struct AdminOrder {
    display_name: String,
    items: Vec<AdminOrderItem>,
}

#[derive(Debug, Deserialize)]
struct AdminOrderItem {
    title_en: String,
    title_zh: String,
    qty: u32,
    note: Option<String>,
    options: Vec<AdminOrderOption>,
}

#[derive(Debug, Deserialize)]
struct AdminOrderOption {
    label_en: String,
}

#[derive(Debug, Deserialize)]
struct AuditTotals {
    per_person: Vec<PersonTotal>,
}

#[derive(Debug, Deserialize)]
struct PersonTotal {
    display_name: String,
    total: i64,
    server_total: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreateFormResponse {
    form_id: String,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct MenuView {
    sections: Vec<SectionView>,
}

#[derive(Debug, Deserialize)]
struct SectionView {
    name_en: String,
    name_zh: String,
    items: Vec<ItemView>,
}

#[derive(Debug, Deserialize)]
struct ItemView {
    title_en: String,
    title_zh: String,
    price_display: String,
    groups: Vec<GroupView>,
}

#[derive(Debug, Deserialize)]
struct GroupView {
    name_en: String,
    selection_mode: String,
    options: Vec<OptionView>,
}

#[derive(Debug, Deserialize)]
struct OptionView {
    label_en: String,
    label_zh: String,
    price_delta: i64,
    price_delta_display: String,
}

fn cents(v: i64) -> String {
    let sign = if v < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, v.abs() / 100, v.abs() % 100)
}

async fn send(req: RequestBuilder) -> Result<Response, anyhow::Error> {
    let res = req.send().await?;
    match res.status() {
        StatusCode::OK => Ok(res),
        unexpected => {
            let message = res.text().await.unwrap_or_default();
            bail!("got unexpected status code {}, {}", unexpected, message)
        }
    }
}

fn print_orders(res: &AdminOrdersResponse) {
    match &res.session {
        Some(s) => println!("{} ({})", s.title, if s.is_locked { "locked" } else { "open" }),
        None => println!("session not found"),
    }
    for order in &res.orders {
        println!("- {}", order.display_name);
        for item in &order.items {
            let options = item.options.iter().map(|o| o.label_en.as_str()).collect::<Vec<_>>();
            print!("    {} x {} / {}", item.qty, item.title_en, item.title_zh);
            if !options.is_empty() {
                print!(" [{}]", options.join(", "));
            }
            match item.note.as_deref().filter(|n| !n.is_empty()) {
                Some(note) => println!(" note: {}", note),
                None => println!(),
            }
        }
    }
    println!("totals:");
    for row in &res.totals.per_person {
        print!("  {:<20} {:>10}", row.display_name, cents(row.total));
        match row.server_total {
            Some(server) if server != row.total => println!("  (server says {})", cents(server)),
            _ => println!(),
        }
    }
    println!("  {:<20} {:>10}", "grand total", res.grand_total_display);
}

fn print_menu(menu: &MenuView) {
    for section in &menu.sections {
        println!("{} / {}", section.name_en, section.name_zh);
        for item in &section.items {
            println!("  {} / {}  {}", item.title_en, item.title_zh, item.price_display);
            for group in &item.groups {
                println!("    {} ({})", group.name_en, group.selection_mode);
                for option in &group.options {
                    if option.price_delta > 0 {
                        println!("      {} / {} +{}", option.label_en, option.label_zh, option.price_delta_display);
                    } else {
                        println!("      {} / {}", option.label_en, option.label_zh);
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();
    let host = env::var("PREORDER_HOST").unwrap_or(DEFAULT_HOST.to_string());
    let client = Client::new();

    match args.command {
        Commands::Admin(admin) => {
            let session = admin.session;
            let req = match admin.command {
                AdminCmds::Orders => client.get(format!("{}/v1/admin/sessions/{}/orders", host, session)),
                AdminCmds::Lock | AdminCmds::Unlock => {
                    let is_locked = matches!(admin.command, AdminCmds::Lock);
                    println!("setting is_locked={} on session={}", is_locked, session);
                    client
                        .put(format!("{}/v1/admin/sessions/{}/lock", host, session))
                        .json(&serde_json::json!({ "is_locked": is_locked }))
                }
            };
            let res = send(req.header(ADMIN_TOKEN_HEADER, admin.token))
                .await?
                .json::<AdminOrdersResponse>()
                .await?;
            print_orders(&res);
        }
        Commands::Menu { session } => {
            let form = send(
                client
                    .post(format!("{}/v1/forms", host))
                    .json(&serde_json::json!({ "session_id": session })),
            )
            .await?
            .json::<CreateFormResponse>()
            .await?;
            println!("menu for session={}", form.session_id);
            let menu = send(client.get(format!("{}/v1/forms/{}/menu", host, form.form_id)))
                .await?
                .json::<MenuView>()
                .await?;
            print_menu(&menu);
        }
    };
    Ok(())
}
