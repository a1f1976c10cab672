// mealcart/src/cli.rs

//! Command-line front end: each subcommand drives the cart or checkout flow
//! the way a screen would.

use crate::cart::{CartOutcome, CartReconciler};
use crate::checkout::{CheckoutMachine, CheckoutState};
use crate::errors::{AppError, Result};
use crate::history::OrderHistory;
use crate::models::CheckoutInput;
use crate::receipt;
use crate::state::AppState;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "mealcart", about = "Browse meals, manage your cart and place orders.")]
pub struct Cli {
  /// Customer whose cart and orders are used. Defaults to CUSTOMER_ID.
  #[arg(long, global = true)]
  pub customer: Option<String>,

  /// Emit logs as JSON lines.
  #[arg(long, global = true)]
  pub json_logs: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List the meal catalog with prices and stock.
  Menu,
  /// Show the cart (server state, falling back to the local cache).
  Cart,
  /// Add one unit of a meal.
  Add { meal_id: String },
  Increase { meal_id: String },
  Decrease { meal_id: String },
  Remove { meal_id: String },
  /// Check out the current cart.
  Checkout(CheckoutArgs),
  /// List past orders, optionally within a date range.
  Orders {
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
  },
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
  #[arg(long)]
  pub address: String,
  #[arg(long)]
  pub phone: String,
  /// "Cash On Delivery" or "Card Payment".
  #[arg(long)]
  pub payment: String,
  #[arg(long, conflicts_with = "for_self")]
  pub gift: bool,
  #[arg(long = "self")]
  pub for_self: bool,
  /// Confirm cash on delivery without prompting.
  #[arg(long, short = 'y')]
  pub yes: bool,
}

pub async fn run(cli: Cli, app_state: AppState) -> Result<()> {
  let customer_id = cli
    .customer
    .or_else(|| app_state.config.customer_id.clone())
    .ok_or_else(|| AppError::Config("No customer given; pass --customer or set CUSTOMER_ID".to_string()))?;
  let mut out = io::stdout().lock();

  match cli.command {
    Command::Menu => {
      let meals = app_state.api.fetch_meals().await?;
      for meal in meals {
        writeln!(out, "{:<26} {:<24} {:>8} (stock {})", meal.id, meal.name, meal.price, meal.stock).map_err(io_err)?;
      }
    }
    Command::Cart => {
      let cart = load_cart(&app_state, &customer_id).await;
      write!(out, "{}", receipt::render_cart(&cart.view())).map_err(io_err)?;
    }
    Command::Add { meal_id } => {
      let cart = load_cart(&app_state, &customer_id).await;
      let meals = app_state.api.fetch_meals().await?;
      let meal = meals
        .into_iter()
        .find(|meal| meal.id == meal_id)
        .ok_or_else(|| AppError::NotFound(format!("Meal {}", meal_id)))?;
      report(&mut out, cart.add(&meal).await?)?;
      write!(out, "{}", receipt::render_cart(&cart.view())).map_err(io_err)?;
    }
    Command::Increase { meal_id } => {
      let cart = load_cart(&app_state, &customer_id).await;
      report(&mut out, cart.increase(&meal_id).await?)?;
      write!(out, "{}", receipt::render_cart(&cart.view())).map_err(io_err)?;
    }
    Command::Decrease { meal_id } => {
      let cart = load_cart(&app_state, &customer_id).await;
      report(&mut out, cart.decrease(&meal_id).await?)?;
      write!(out, "{}", receipt::render_cart(&cart.view())).map_err(io_err)?;
    }
    Command::Remove { meal_id } => {
      let cart = load_cart(&app_state, &customer_id).await;
      report(&mut out, cart.remove(&meal_id).await?)?;
      write!(out, "{}", receipt::render_cart(&cart.view())).map_err(io_err)?;
    }
    Command::Checkout(args) => {
      let cart = load_cart(&app_state, &customer_id).await;
      checkout(&mut out, &app_state, &cart, args).await?;
    }
    Command::Orders { from, to } => {
      let history = OrderHistory::load(app_state.api.as_ref(), &customer_id).await?;
      let selected = history.between(from, to);
      for order in &selected {
        receipt::write_order_receipt(&mut out, order).map_err(io_err)?;
        writeln!(out).map_err(io_err)?;
      }
      writeln!(out, "{} order(s), {} spent", selected.len(), OrderHistory::total_spent(&selected)).map_err(io_err)?;
    }
  }
  Ok(())
}

/// Cache first, then the server. A failed fetch leaves the cached cart shown.
async fn load_cart(app_state: &AppState, customer_id: &str) -> CartReconciler {
  let cart = CartReconciler::new(app_state.clone(), customer_id);
  cart.hydrate_from_cache();
  if let Err(e) = cart.fetch_authoritative().await {
    warn!(error = %e, "Showing cached cart; server unavailable.");
  }
  cart
}

async fn checkout(out: &mut impl Write, app_state: &AppState, cart: &CartReconciler, args: CheckoutArgs) -> Result<()> {
  let input = CheckoutInput {
    delivery_address: args.address,
    contact_phone: args.phone,
    payment_method: args.payment,
    gift: args.gift,
    for_self: args.for_self,
  };
  let mut machine = CheckoutMachine::new(app_state.clone(), cart.customer_id()).with_input(input);

  let submitted = machine.submit(&cart.view())?.clone();
  match submitted {
    CheckoutState::Entering => {
      return Err(AppError::Validation(machine.field_errors().clone()));
    }
    CheckoutState::CardRedirect(handoff) => {
      let payload = serde_json::to_string_pretty(&handoff).map_err(|e| AppError::Internal(e.to_string()))?;
      writeln!(out, "Continue with card payment using:\n{}", payload).map_err(io_err)?;
      return Ok(());
    }
    CheckoutState::CashConfirming(draft) => {
      let total = draft.totals.total;
      if !args.yes && !ask(out, &format!("Place cash on delivery order for {}? [y/N] ", total))? {
        machine.cancel()?;
        writeln!(out, "Order not placed.").map_err(io_err)?;
        return Ok(());
      }
    }
    other => return Err(AppError::Internal(format!("unexpected checkout state {}", other.name()))),
  }

  let placed = machine.confirm().await?.clone();
  match placed {
    CheckoutState::Success(order) => {
      receipt::write_order_receipt(out, &order).map_err(io_err)?;
      info!(order_id = %order.id, "Order placed.");
    }
    CheckoutState::Failed(message) => {
      writeln!(out, "Order failed: {}", message).map_err(io_err)?;
      return Ok(());
    }
    other => return Err(AppError::Internal(format!("unexpected checkout state {}", other.name()))),
  }

  if let Err(e) = cart.fetch_authoritative().await {
    warn!(error = %e, "Could not refresh cart after ordering.");
  }
  if let Ok(crate::checkout::Navigation::OrderHistory) = machine.wait_for_redirect().await {
    writeln!(out, "See your orders with `mealcart orders`.").map_err(io_err)?;
  }
  Ok(())
}

fn report(out: &mut impl Write, outcome: CartOutcome) -> Result<()> {
  let line = match outcome {
    CartOutcome::Updated(item) => format!("{} x{}", item.meal_name, item.quantity),
    CartOutcome::Removed => "Removed.".to_string(),
    CartOutcome::Unchanged => "Nothing changed.".to_string(),
  };
  writeln!(out, "{}", line).map_err(io_err)
}

fn ask(out: &mut impl Write, prompt: &str) -> Result<bool> {
  write!(out, "{}", prompt).map_err(io_err)?;
  out.flush().map_err(io_err)?;
  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer).map_err(io_err)?;
  Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn io_err(e: io::Error) -> AppError {
  AppError::Internal(format!("terminal I/O failed: {}", e))
}
