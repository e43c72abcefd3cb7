//! Prompt construction for insight generation and Q&A.
//!
//! The dispatcher treats prompts as opaque strings; everything the model
//! needs to know about the user's finances is rendered here. Amounts use
//! Indian digit grouping (lakh/crore) to match the host application.

use paisa_core::FinancialSnapshot;
use std::fmt::Write;

/// Format a rupee amount with Indian digit grouping.
///
/// The last three digits form one group, every group before that has two
/// digits. Fractions are rounded to whole rupees.
///
/// # Examples
///
/// ```
/// use paisa::format_inr;
///
/// assert_eq!(format_inr(512.0), "512");
/// assert_eq!(format_inr(45_000.0), "45,000");
/// assert_eq!(format_inr(200_000.0), "2,00,000");
/// assert_eq!(format_inr(12_345_678.0), "1,23,45,678");
/// assert_eq!(format_inr(-1_500.0), "-1,500");
/// ```
pub fn format_inr(amount: f64) -> String {
    let rupees = amount.abs().round() as u64;
    let grouped = group_indian(&rupees.to_string());
    if amount < -0.5 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Indian grouping over a plain digit string.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let head: Vec<char> = head.chars().collect();

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(head[end - 2..end].iter().collect::<String>());
        end -= 2;
    }
    groups.push(head[..end].iter().collect());
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Build the full financial-analysis prompt.
///
/// Renders the complete snapshot (totals, top category and day, recent
/// transactions, goals, budgets) and instructs the model to reply with a
/// bare JSON object matching [`paisa_core::AiInsight`].
pub fn build_insight_prompt(snapshot: &FinancialSnapshot) -> String {
    let totals = snapshot.totals();
    let mut prompt = format!(
        "You are a friendly and knowledgeable Indian financial advisor named \"Paisa Buddy AI\". \
         Analyze this user's financial data and provide personalized insights in a warm, \
         encouraging tone.\n\n\
         ## User's Financial Snapshot (amounts in INR ₹):\n\n\
         **Monthly Overview:**\n\
         - Total Income: ₹{}\n\
         - Total Expenses: ₹{}\n\
         - Net Savings: ₹{}\n\
         - Savings Rate: {}%\n",
        format_inr(*totals.income()),
        format_inr(*totals.expenses()),
        format_inr(*totals.net()),
        totals.savings_rate(),
    );

    if let Some(category) = snapshot.highest_category() {
        let _ = write!(
            prompt,
            "\n**Top Spending Category:** {} (₹{})\n",
            category.category(),
            format_inr(*category.amount())
        );
    }

    if let Some(day) = snapshot.top_day() {
        let _ = write!(
            prompt,
            "\n**Highest Spending Day:** {} (₹{})\n",
            day.day(),
            format_inr(*day.amount())
        );
    }

    prompt.push_str("\n**Recent Transactions:**\n");
    for transaction in snapshot.recent() {
        let _ = writeln!(
            prompt,
            "- {}: ₹{} ({})",
            transaction.name(),
            format_inr(*transaction.amount()),
            transaction.category()
        );
    }

    if !snapshot.goals().is_empty() {
        prompt.push_str("\n**Savings Goals:**\n");
        for goal in snapshot.goals() {
            let _ = writeln!(
                prompt,
                "- {}: ₹{} / ₹{} ({}% complete)",
                goal.name(),
                format_inr(*goal.current()),
                format_inr(*goal.target()),
                goal.progress()
            );
        }
    }

    if !snapshot.budgets().is_empty() {
        prompt.push_str("\n**Budget Status:**\n");
        for budget in snapshot.budgets() {
            let _ = writeln!(
                prompt,
                "- {}: ₹{} / ₹{} ({}% used)",
                budget.category(),
                format_inr(*budget.spent()),
                format_inr(*budget.limit()),
                budget.percent_used()
            );
        }
    }

    prompt.push_str(
        "\n---\n\n\
         Please provide a comprehensive financial analysis with:\n\n\
         1. **Summary** (2-3 sentences): Overall financial health assessment\n\
         2. **Key Recommendations** (3-4 bullet points): Actionable advice to improve finances\n\
         3. **Warnings** (1-2 bullet points): Any concerning patterns or risks\n\
         4. **Opportunities** (2-3 bullet points): Ways to save more or grow wealth\n\n\
         Use Indian financial context (mention SIP, PPF, NPS, mutual funds where relevant). \
         Be encouraging but honest. Include specific numbers from the data. Use simple \
         language suitable for someone new to personal finance.\n\n\
         IMPORTANT: Return ONLY valid JSON without any markdown code blocks or extra text. \
         Use this exact format:\n\
         {\"summary\": \"Your overall assessment here\", \"recommendations\": [\"Recommendation 1\", \
         \"Recommendation 2\"], \"warnings\": [\"Warning 1\"], \"opportunities\": [\"Opportunity 1\"]}",
    );

    prompt
}

/// Build the short conversational Q&A prompt.
///
/// Carries only the headline figures; the reply is expected as plain text,
/// not JSON.
pub fn build_question_prompt(question: &str, snapshot: &FinancialSnapshot) -> String {
    let totals = snapshot.totals();
    let mut prompt = format!(
        "You are Paisa Buddy AI, a friendly Indian financial advisor. Answer this question \
         based on the user's financial data.\n\n\
         User's Question: \"{}\"\n\n\
         Financial Context (INR):\n\
         - Income: ₹{}\n\
         - Expenses: ₹{}\n\
         - Net: ₹{}\n\
         - Savings Rate: {}%\n",
        question,
        format_inr(*totals.income()),
        format_inr(*totals.expenses()),
        format_inr(*totals.net()),
        totals.savings_rate(),
    );

    if let Some(category) = snapshot.highest_category() {
        let _ = write!(
            prompt,
            "- Top Category: {} (₹{})\n",
            category.category(),
            format_inr(*category.amount())
        );
    }

    prompt.push_str(
        "\nProvide a concise, helpful answer (2-4 sentences) with specific advice. Use ₹ for \
         currency. Do not format as JSON - just respond in plain conversational text.",
    );

    prompt
}
