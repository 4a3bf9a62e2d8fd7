use std::io::{self, BufRead, Write};

use libris_core::checkout::{CheckoutFlow, OrderField, OrderForm, Stage};

use crate::commands::CommandResult;

const SHIPPING_FIELDS: [(OrderField, &str); 5] = [
    (OrderField::Name, "Full name"),
    (OrderField::Address, "Address"),
    (OrderField::City, "City"),
    (OrderField::PostalCode, "Postal code"),
    (OrderField::Country, "Country"),
];

const PAYMENT_FIELDS: [(OrderField, &str); 3] = [
    (OrderField::CardNumber, "Card number"),
    (OrderField::Expiry, "Expiry date (MM/YY)"),
    (OrderField::Cvv, "CVV"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Completed,
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Back,
    Place,
    Quit,
}

pub fn run() -> CommandResult {
    let stdin = io::stdin();
    let stdout = io::stdout();

    match run_wizard(&mut stdin.lock(), &mut stdout.lock()) {
        Ok(_) => CommandResult::success(String::new()),
        Err(error) => CommandResult::failure(format!("checkout input failed: {error}"), 3),
    }
}

/// Drive one checkout traversal over the given streams. Field prompts
/// keep the current value on a blank line; a rejected advance re-renders
/// the stage with its validation banner. The flow state lives for exactly
/// this call.
pub fn run_wizard<R, W>(input: &mut R, output: &mut W) -> io::Result<CheckoutOutcome>
where
    R: BufRead,
    W: Write,
{
    let mut flow = CheckoutFlow::new();
    writeln!(output, "Checkout")?;

    loop {
        match flow.stage().clone() {
            Stage::Shipping => {
                render_header(output, &flow)?;
                collect_fields(input, output, &mut flow, &SHIPPING_FIELDS)?;
                match prompt_action(input, output, "[c] continue  [q] quit")? {
                    Some(Action::Continue) => {
                        let _ = flow.advance();
                    }
                    Some(Action::Quit) | None => return abandon(output),
                    _ => {}
                }
            }
            Stage::Payment => {
                render_header(output, &flow)?;
                collect_fields(input, output, &mut flow, &PAYMENT_FIELDS)?;
                match prompt_action(input, output, "[c] continue  [b] back  [q] quit")? {
                    Some(Action::Continue) => {
                        let _ = flow.advance();
                    }
                    Some(Action::Back) => {
                        let _ = flow.retreat();
                    }
                    Some(Action::Quit) | None => return abandon(output),
                    _ => {}
                }
            }
            Stage::Review => {
                render_header(output, &flow)?;
                write!(output, "{}", render_review(flow.form()))?;
                match prompt_action(input, output, "[p] place order  [b] back  [q] quit")? {
                    Some(Action::Place) => {
                        let _ = flow.complete();
                    }
                    Some(Action::Back) => {
                        let _ = flow.retreat();
                    }
                    Some(Action::Quit) | None => return abandon(output),
                    _ => {}
                }
            }
            Stage::Confirmation => {
                writeln!(output)?;
                writeln!(output, "Order Confirmed!")?;
                writeln!(output, "Thank you for your purchase. Your order is being processed.")?;
                return Ok(CheckoutOutcome::Completed);
            }
        }
    }
}

fn render_header<W: Write>(output: &mut W, flow: &CheckoutFlow) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "Step {} of 4: {}", flow.step(), flow.stage().title())?;
    if let Some(message) = flow.error() {
        writeln!(output, "{message}")?;
    }
    Ok(())
}

fn collect_fields<R, W>(
    input: &mut R,
    output: &mut W,
    flow: &mut CheckoutFlow,
    fields: &[(OrderField, &str)],
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for (field, label) in fields {
        write!(output, "{label} [{}]: ", flow.form().get(*field))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // End of input; keep whatever the form already holds.
            return Ok(());
        }
        let value = line.trim_end_matches(['\r', '\n']);
        if !value.is_empty() {
            flow.set_field(*field, value);
        }
    }
    Ok(())
}

fn prompt_action<R, W>(input: &mut R, output: &mut W, choices: &str) -> io::Result<Option<Action>>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "{choices}")?;
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "c" | "continue" => return Ok(Some(Action::Continue)),
            "b" | "back" => return Ok(Some(Action::Back)),
            "p" | "place" | "confirm" => return Ok(Some(Action::Place)),
            "q" | "quit" => return Ok(Some(Action::Quit)),
            "" => continue,
            other => writeln!(output, "Unrecognized choice `{other}`.")?,
        }
    }
}

fn render_review(form: &OrderForm) -> String {
    let mut lines = vec![
        "Order Summary".to_string(),
        String::new(),
        "Shipping".to_string(),
        format!("  Name: {}", form.name),
        format!("  Address: {}", form.address),
        format!("  City: {}", form.city),
        format!("  Postal code: {}", form.postal_code),
        format!("  Country: {}", form.country),
        String::new(),
        "Payment".to_string(),
        format!("  Card: •••• •••• •••• {}", form.card_tail()),
        format!("  Expiry: {}", form.expiry),
        String::new(),
        "Order total".to_string(),
    ];

    // The order total is the service's flat demo pricing; the wizard does
    // not price the cart.
    lines.push("  Subtotal  $99.00".to_string());
    lines.push("  Shipping  $0.00".to_string());
    lines.push("  Total     $99.00".to_string());
    lines.push(String::new());

    lines.join("\n")
}

fn abandon<W: Write>(output: &mut W) -> io::Result<CheckoutOutcome> {
    writeln!(output)?;
    writeln!(output, "Checkout abandoned.")?;
    Ok(CheckoutOutcome::Abandoned)
}
