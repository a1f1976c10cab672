// mealcart/src/receipt.rs

//! Plain-text receipts for placed orders and cart summaries.

use crate::cart::CartView;
use crate::models::{CartTotals, Order, OrderLine};
use std::fmt::Write;
use std::io;
use tabled::{
  builder::Builder,
  settings::{object::Columns, Alignment, Style},
};

const HEADER: [&str; 4] = ["Meal", "Unit price", "Qty", "Line total"];

/// Writes the receipt of a placed order.
pub fn write_order_receipt(out: &mut impl io::Write, order: &Order) -> io::Result<()> {
  out.write_all(render_order_receipt(order).as_bytes())
}

pub fn render_order_receipt(order: &Order) -> String {
  let mut out = String::new();
  // fmt::Write into a String only fails if a Display impl does.
  writeln!(out, "Order {}  ({})", order.id, order.created_at.format("%Y-%m-%d %H:%M")).ok();
  writeln!(out, "{}", lines_table(&order.items)).ok();
  out.push_str(&totals_block(&order.totals));
  writeln!(out, "Payment:  {}", order.payment_method).ok();
  writeln!(out, "Deliver to: {} ({})", order.delivery_address, order.contact_phone).ok();
  if order.is_gift {
    out.push_str("Sent as a gift\n");
  }
  out
}

pub fn render_cart(view: &CartView) -> String {
  if view.is_empty() {
    return "Your cart is empty.\n".to_string();
  }
  let lines: Vec<OrderLine> = view.items.iter().map(OrderLine::from).collect();
  format!("{}\n{}", lines_table(&lines), totals_block(&view.totals()))
}

fn lines_table(lines: &[OrderLine]) -> String {
  let mut builder = Builder::default();
  builder.push_record(HEADER.map(String::from));
  for line in lines {
    builder.push_record([
      line.meal_name.clone(),
      line.unit_price.to_string(),
      line.quantity.to_string(),
      line.line_total.to_string(),
    ]);
  }
  let mut table = builder.build();
  table.with(Style::modern_rounded());
  table.modify(Columns::new(1..4), Alignment::right());
  table.to_string()
}

fn totals_block(totals: &CartTotals) -> String {
  format!(
    "Subtotal: {:>10}\nDelivery: {:>10}\nTotal:    {:>10}\n",
    totals.subtotal, totals.delivery_fee, totals.total
  )
}
