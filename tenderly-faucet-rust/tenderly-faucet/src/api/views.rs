//! Server-rendered faucet page

use crate::app::{ConnectionView, FormState, TimestampFormState};
use crate::utils::sanitizer::escape_html;
use chrono::DateTime;
use std::fmt::Write;
use tenderly_faucet_core::{BalanceSnapshot, TimeUnit, TokenDescriptor};

/// Everything the index page shows
pub struct IndexPage<'a> {
    pub connection: &'a ConnectionView,
    pub tokens: &'a [TokenDescriptor],
    pub form: &'a FormState,
    pub timestamp_form: &'a TimestampFormState,
    pub saved_addresses: &'a [String],
    pub balances: Option<&'a BalanceSnapshot>,
    pub balance_error: Option<String>,
    pub timestamp: Option<u64>,
    pub form_error: Option<String>,
    pub form_success: Option<String>,
    pub timestamp_error: Option<String>,
    pub timestamp_success: Option<String>,
}

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem}\
section{border:1px solid #ddd;border-radius:6px;padding:1rem;margin-bottom:1rem}\
label{display:block;margin:.5rem 0 .25rem}input,select{width:100%;padding:.4rem}\
.error{color:#b00020}.success{color:#1b7f3b}.muted{color:#666}\
table{width:100%;border-collapse:collapse}td{padding:.25rem 0}";

pub fn render_index(page: &IndexPage<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    let _ = write!(html, "<title>Tenderly Faucet</title><style>{STYLE}</style></head><body>");
    html.push_str("<h1>Tenderly Faucet</h1>");

    render_connection(&mut html, page.connection);
    if page.connection.connected {
        render_fund_form(&mut html, page);
        render_balances(&mut html, page);
        render_timestamp(&mut html, page);
    }

    html.push_str("</body></html>");
    html
}

fn render_connection(html: &mut String, connection: &ConnectionView) {
    html.push_str("<section id=\"connection\"><h2>Virtual TestNet</h2>");

    match (&connection.guid, &connection.url) {
        (Some(guid), _) if connection.connected => {
            let _ = write!(html, "<p>Connected to <code>{}</code>", escape_html(guid));
        }
        (None, Some(url)) if connection.connected => {
            let _ = write!(html, "<p>Connected to <code>{}</code>", escape_html(url));
        }
        _ => html.push_str("<p class=\"muted\">Not connected"),
    }
    if let Some(region) = connection.region.as_deref().filter(|r| *r != "default") {
        let _ = write!(html, " ({})", escape_html(region));
    }
    html.push_str("</p>");

    if let Some(error) = &connection.error {
        let _ = write!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }

    html.push_str("<form method=\"post\" action=\"/connect\"><label for=\"rpc_url\">RPC URL or GUID</label>");
    let current = connection.url.as_deref().unwrap_or_default();
    let _ = write!(
        html,
        "<input id=\"rpc_url\" name=\"rpc_url\" value=\"{}\" placeholder=\"https://virtual.mainnet.rpc.tenderly.co/...\">",
        escape_html(current)
    );
    if let Some(error) = &connection.validation_error {
        let _ = write!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }
    html.push_str("<button type=\"submit\">Connect</button></form>");

    if connection.connected {
        html.push_str("<form method=\"post\" action=\"/disconnect\"><button type=\"submit\">Change RPC</button></form>");
    }
    html.push_str("</section>");
}

fn render_fund_form(html: &mut String, page: &IndexPage<'_>) {
    let form = page.form;
    html.push_str("<section id=\"fund\"><h2>Set balance</h2><form method=\"post\" action=\"/fund\">");

    html.push_str("<label for=\"token\">Token</label><select id=\"token\" name=\"token\">");
    for token in page.tokens {
        let selected = if token.address.eq_ignore_ascii_case(&form.selected_token) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{} ({})</option>",
            escape_html(&token.address),
            selected,
            escape_html(&token.symbol),
            escape_html(&token.name)
        );
    }
    html.push_str("</select>");

    let checked = if form.use_custom_token { " checked" } else { "" };
    let _ = write!(
        html,
        "<label><input type=\"checkbox\" name=\"use_custom_token\" value=\"true\" style=\"width:auto\"{checked}> Use custom token</label>"
    );
    let _ = write!(
        html,
        "<input name=\"custom_token\" value=\"{}\" placeholder=\"0x... ERC-20 address\">",
        escape_html(&form.custom_token)
    );

    html.push_str("<label for=\"recipient\">Recipient</label>");
    let _ = write!(
        html,
        "<input id=\"recipient\" name=\"recipient\" list=\"saved-addresses\" value=\"{}\" placeholder=\"0x...\">",
        escape_html(&form.recipient)
    );
    html.push_str("<datalist id=\"saved-addresses\">");
    for address in page.saved_addresses {
        let _ = write!(html, "<option value=\"{}\"></option>", escape_html(address));
    }
    html.push_str("</datalist>");

    html.push_str("<label for=\"amount\">Amount</label>");
    let _ = write!(
        html,
        "<input id=\"amount\" name=\"amount\" inputmode=\"decimal\" value=\"{}\" placeholder=\"100\">",
        escape_html(&form.amount)
    );
    let label = if form.loading { "Setting..." } else { "Set balance" };
    let _ = write!(html, "<button type=\"submit\">{label}</button></form>");

    render_notices(html, page.form_error.as_deref(), page.form_success.as_deref());

    if !page.saved_addresses.is_empty() {
        html.push_str("<h3>Saved addresses</h3><table>");
        for address in page.saved_addresses {
            let escaped = escape_html(address);
            let _ = write!(
                html,
                "<tr><td><a href=\"/?address={escaped}\"><code>{escaped}</code></a></td><td>\
                 <form method=\"post\" action=\"/addresses/remove\"><input type=\"hidden\" name=\"address\" value=\"{escaped}\">\
                 <button type=\"submit\">Remove</button></form></td></tr>"
            );
        }
        html.push_str("</table>");
    }
    html.push_str("</section>");
}

fn render_balances(html: &mut String, page: &IndexPage<'_>) {
    if page.balances.is_none() && page.balance_error.is_none() {
        return;
    }
    html.push_str("<section id=\"balances\"><h2>Balances</h2>");
    if let Some(error) = &page.balance_error {
        let _ = write!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }
    if let Some(balances) = page.balances {
        let _ = write!(html, "<table><tr><td>ETH</td><td>{}</td></tr>", escape_html(&balances.eth));
        for token in page.tokens.iter().filter(|t| !t.is_native()) {
            if let Some(balance) = balances.tokens.get(&token.symbol) {
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td></tr>",
                    escape_html(&token.symbol),
                    escape_html(balance)
                );
            }
        }
        html.push_str("</table>");
    }
    html.push_str("</section>");
}

fn render_timestamp(html: &mut String, page: &IndexPage<'_>) {
    html.push_str("<section id=\"timestamp\"><h2>Block timestamp</h2>");
    match page.timestamp {
        Some(timestamp) => {
            let human = DateTime::from_timestamp(timestamp as i64, 0)
                .map(|t| t.to_rfc2822())
                .unwrap_or_default();
            let _ = write!(html, "<p><code>{timestamp}</code> <span class=\"muted\">{human}</span></p>");
        }
        None => html.push_str("<p class=\"muted\">Timestamp unavailable</p>"),
    }

    let form = page.timestamp_form;
    html.push_str("<form method=\"post\" action=\"/advance\"><label for=\"advance_amount\">Advance by</label>");
    let amount = if form.advance_amount == 0 {
        String::new()
    } else {
        form.advance_amount.to_string()
    };
    let _ = write!(
        html,
        "<input id=\"advance_amount\" name=\"amount\" inputmode=\"numeric\" value=\"{amount}\" placeholder=\"1\">"
    );
    html.push_str("<select name=\"unit\">");
    for unit in TimeUnit::all() {
        let selected = if unit == form.time_unit { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{unit}\"{selected}>{unit}</option>");
    }
    let label = if form.loading { "Advancing..." } else { "Advance" };
    let _ = write!(html, "</select><button type=\"submit\">{label}</button></form>");

    render_notices(html, page.timestamp_error.as_deref(), page.timestamp_success.as_deref());
    html.push_str("</section>");
}

fn render_notices(html: &mut String, error: Option<&str>, success: Option<&str>) {
    if let Some(error) = error {
        let _ = write!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }
    if let Some(success) = success {
        let _ = write!(html, "<p class=\"success\">{}</p>", escape_html(success));
    }
}
