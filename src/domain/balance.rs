use super::{Category, Cents, Transaction, TransactionType};

/// Balance = sum of income amounts - sum of expense amounts.
/// Saturates at the `i64` bounds instead of overflowing.
pub fn compute_balance(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |balance: Cents, transaction| {
            balance.saturating_add(transaction.signed_cents())
        })
}

/// Total of all amounts of one type.
pub fn total_for_type(kind: TransactionType, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| match kind {
            TransactionType::Income => t.is_income(),
            TransactionType::Expense => t.is_expense(),
        })
        .fold(0, |total: Cents, t| total.saturating_add(t.amount.cents()))
}

/// Per (category, type) totals, in the order each pair first appears.
/// Returns `(category, type, total, count)` tuples.
pub fn category_totals(transactions: &[Transaction]) -> Vec<(Category, TransactionType, Cents, usize)> {
    let mut totals: Vec<(Category, TransactionType, Cents, usize)> = Vec::new();

    for transaction in transactions {
        match totals
            .iter_mut()
            .find(|(category, kind, _, _)| *category == transaction.category && *kind == transaction.kind)
        {
            Some((_, _, total, count)) => {
                *total = total.saturating_add(transaction.amount.cents());
                *count += 1;
            }
            None => totals.push((
                transaction.category,
                transaction.kind,
                transaction.amount.cents(),
                1,
            )),
        }
    }

    totals
}
