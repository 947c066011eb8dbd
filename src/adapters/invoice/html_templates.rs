//! HTML invoice templates.

use crate::domain::billing::Invoice;
use crate::ports::{InvoiceTemplates, RenderedEmail, TemplateError};

const INVOICE_EMAIL_SUBJECT: &str = "Your Payment Invoice";

/// Renders invoices with inline-styled HTML.
#[derive(Debug, Clone)]
pub struct HtmlInvoiceTemplates {
    company_name: String,
    public_base_url: String,
}

impl HtmlInvoiceTemplates {
    pub fn new(company_name: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn download_url(&self, invoice: &Invoice) -> String {
        format!("{}{}", self.public_base_url, invoice.download_path)
    }

    fn email_html(&self, invoice: &Invoice) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #333; background: #f5f5f5; margin: 0; }}
        .card {{ max-width: 600px; margin: 32px auto; background: #fff; border-radius: 8px; padding: 32px; }}
        table {{ width: 100%; border-collapse: collapse; margin: 24px 0; }}
        td {{ padding: 8px 0; border-bottom: 1px solid #eee; }}
        td.label {{ color: #666; }}
        .total td {{ font-weight: bold; border-bottom: none; }}
        .button {{ display: inline-block; padding: 12px 20px; background: #2563eb; color: #fff; border-radius: 6px; text-decoration: none; }}
    </style>
</head>
<body>
    <div class="card">
        <h1>Payment received</h1>
        <p>Hello {org},</p>
        <p>Thank you for your payment. Your subscription is now active.</p>
        <table>
            <tr><td class="label">Transaction ID</td><td>{transaction}</td></tr>
            <tr><td class="label">Payment date</td><td>{paid}</td></tr>
            <tr><td class="label">Plan</td><td>{plan}</td></tr>
            <tr><td class="label">Start date</td><td>{start}</td></tr>
            <tr><td class="label">End date</td><td>{end}</td></tr>
            <tr><td class="label">Amount</td><td>{amount}</td></tr>
            <tr class="total"><td>Total</td><td>{total}</td></tr>
        </table>
        <p><a class="button" href="{url}">Download invoice</a></p>
        <p>{company}</p>
    </div>
</body>
</html>"#,
            org = escape_html(&invoice.billed_to.name),
            transaction = escape_html(&invoice.transaction_id),
            paid = escape_html(&invoice.payment_date),
            plan = escape_html(&invoice.plan_name),
            start = escape_html(&invoice.period_start),
            end = escape_html(&invoice.period_end),
            amount = escape_html(&invoice.amount_display),
            total = escape_html(&invoice.total_display),
            url = escape_html(&self.download_url(invoice)),
            company = escape_html(&self.company_name),
        )
    }

    fn email_text(&self, invoice: &Invoice) -> String {
        format!(
            "Hello {},\n\nThank you for your payment. Your subscription is now active.\n\n\
             Transaction ID: {}\nPayment date: {}\nPlan: {}\nStart date: {}\nEnd date: {}\n\
             Amount: {}\nTotal: {}\n\nDownload your invoice: {}\n\n--\n{}",
            invoice.billed_to.name,
            invoice.transaction_id,
            invoice.payment_date,
            invoice.plan_name,
            invoice.period_start,
            invoice.period_end,
            invoice.amount_display,
            invoice.total_display,
            self.download_url(invoice),
            self.company_name,
        )
    }
}

impl InvoiceTemplates for HtmlInvoiceTemplates {
    fn invoice_email(&self, invoice: &Invoice) -> Result<RenderedEmail, TemplateError> {
        Ok(RenderedEmail {
            subject: INVOICE_EMAIL_SUBJECT.to_string(),
            html: self.email_html(invoice),
            text: self.email_text(invoice),
        })
    }

    fn invoice_document(&self, invoice: &Invoice) -> Result<String, TemplateError> {
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Invoice {order}</title>
    <style>
        @page {{ size: A4; margin: 20mm; }}
        body {{ font-family: 'Helvetica Neue', Arial, sans-serif; color: #222; font-size: 12px; }}
        header {{ display: flex; justify-content: space-between; border-bottom: 2px solid #222; padding-bottom: 12px; }}
        h1 {{ margin: 0; font-size: 28px; letter-spacing: 2px; }}
        .meta td {{ padding: 2px 12px 2px 0; }}
        .billed {{ margin: 24px 0; }}
        table.items {{ width: 100%; border-collapse: collapse; }}
        table.items th {{ text-align: left; background: #f0f0f0; padding: 8px; }}
        table.items td {{ padding: 8px; border-bottom: 1px solid #ddd; }}
        .amount {{ text-align: right; }}
        .total {{ margin-top: 16px; text-align: right; font-size: 16px; font-weight: bold; }}
    </style>
</head>
<body>
    <header>
        <div><h1>INVOICE</h1><div>{company}</div></div>
        <table class="meta">
            <tr><td>Order number</td><td>{order}</td></tr>
            <tr><td>Date</td><td>{paid}</td></tr>
            <tr><td>Transaction</td><td>{transaction}</td></tr>
        </table>
    </header>
    <section class="billed">
        <strong>Billed to</strong><br>
        {org}<br>
        {address}<br>
        {phone}<br>
        {email}
    </section>
    <table class="items">
        <thead><tr><th>Plan</th><th>Renews on</th><th>Period</th><th class="amount">Amount</th></tr></thead>
        <tbody>
            <tr><td>{plan}</td><td>{end}</td><td>{period}</td><td class="amount">{amount}</td></tr>
        </tbody>
    </table>
    <div class="total">Total: {total}</div>
</body>
</html>"#,
            company = escape_html(&self.company_name),
            order = escape_html(&invoice.order_number),
            paid = escape_html(&invoice.payment_date),
            transaction = escape_html(&invoice.transaction_id),
            org = escape_html(&invoice.billed_to.name),
            address = escape_html(&invoice.billed_to.address),
            phone = escape_html(&invoice.billed_to.phone),
            email = escape_html(&invoice.billed_to.email),
            plan = escape_html(&invoice.plan_name),
            end = escape_html(&invoice.period_end),
            period = escape_html(&invoice.period_label()),
            amount = escape_html(&invoice.amount_display),
            total = escape_html(&invoice.total_display),
        ))
    }
}

/// Escapes text for safe interpolation into HTML bodies and attributes.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BilledTo, Money};
    use crate::domain::foundation::PlanPaymentId;

    fn invoice() -> Invoice {
        Invoice {
            payment_id: PlanPaymentId::new(),
            order_number: "Q1w2E3".to_string(),
            transaction_id: "pay_Z9".to_string(),
            payment_date: "01/02/2024".to_string(),
            period_start: "01/02/2024".to_string(),
            period_end: "02/03/2024".to_string(),
            plan_name: "Pro <Monthly>".to_string(),
            amount: Money::from_minor(99_900, "INR").unwrap(),
            amount_display: "₹999.00".to_string(),
            total_display: "₹999.00".to_string(),
            billed_to: BilledTo {
                name: "Acme & Sons".to_string(),
                email: "ops@acme.test".to_string(),
                address: "12 MG Road, India".to_string(),
                phone: "+91 98450 00000".to_string(),
            },
            download_path: "/api/download-invoice/pay_Z9".to_string(),
        }
    }

    fn templates() -> HtmlInvoiceTemplates {
        HtmlInvoiceTemplates::new("Nexus", "https://app.nexus.test/")
    }

    #[test]
    fn email_has_fixed_subject_and_download_link() {
        let email = templates().invoice_email(&invoice()).unwrap();

        assert_eq!(email.subject, "Your Payment Invoice");
        assert!(email.html.contains("https://app.nexus.test/api/download-invoice/pay_Z9"));
        assert!(email.text.contains("https://app.nexus.test/api/download-invoice/pay_Z9"));
        assert!(email.text.contains("Transaction ID: pay_Z9"));
    }

    #[test]
    fn email_escapes_organization_supplied_text() {
        let email = templates().invoice_email(&invoice()).unwrap();
        assert!(email.html.contains("Acme &amp; Sons"));
        assert!(!email.html.contains("Pro <Monthly>"));
    }

    #[test]
    fn document_contains_line_item_and_total() {
        let html = templates().invoice_document(&invoice()).unwrap();

        assert!(html.contains("Q1w2E3"));
        assert!(html.contains("01/02/2024 - 02/03/2024"));
        assert!(html.contains("Total: ₹999.00"));
        assert!(html.contains("Pro &lt;Monthly&gt;"));
        assert!(html.contains("size: A4"));
    }

    #[test]
    fn escape_html_handles_all_special_characters() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
