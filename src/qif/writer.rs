use itertools::Itertools;

use crate::brokerage::{classify_tx, BrokerageExport, BrokerageTx, ClassifiedTx, UnsupportedAction};
use crate::util::decimal::parse_currency;

use super::{
    QifAction, QifLine, QifRecord, INVESTMENT_ACCOUNT_HEADER, MATCHED_PAST_TXS_CATEGORY,
};

/// Converts one classified transaction into its QIF record.
///
/// Line order is fixed: date, action, memo/payee, quantity, price,
/// amount/total (and the transfer lines for cash transfers in), commission,
/// terminator. Lines for empty source fields are left out, except for the
/// commission, which defaults to zero.
pub fn tx_to_qif_record(tx: &ClassifiedTx) -> QifRecord {
    let mut lines = vec![
        QifLine::Date(tx.date.clone()),
        QifLine::Action(tx.action),
    ];

    if !tx.action.is_payee_only() && !tx.description.is_empty() {
        lines.push(QifLine::Memo(tx.description.clone()));
    }
    lines.push(QifLine::Payee(format!(
        "{}-{}-{}",
        tx.description, tx.symbol, tx.raw_action
    )));

    if !tx.quantity.is_empty() {
        lines.push(QifLine::Quantity(parse_currency(&tx.quantity)));
    }
    if !tx.price.is_empty() {
        lines.push(QifLine::Price(parse_currency(&tx.price)));
    }

    if !tx.amount.is_empty() {
        let mut amount = parse_currency(&tx.amount);
        if tx.action == QifAction::Buy {
            // Cash out of the account
            amount = -amount;
        }
        lines.push(QifLine::Amount(amount));
        lines.push(QifLine::Total(amount));
        if tx.action == QifAction::CashTransferIn {
            lines.push(QifLine::TransferAmount(amount));
            lines.push(QifLine::Category(MATCHED_PAST_TXS_CATEGORY.to_string()));
        }
    }

    let commission = if tx.commission.is_empty() {
        None
    } else {
        Some(parse_currency(&tx.commission))
    };
    lines.push(QifLine::Commission(commission));
    lines.push(QifLine::End);

    QifRecord {
        action: tx.action,
        lines,
    }
}

#[derive(Debug, Default)]
pub struct ConvertResult {
    /// In input order
    pub records: Vec<QifRecord>,
    /// One per input transaction which produced no record, in input order
    pub skipped: Vec<UnsupportedAction>,
}

/// Converts each transaction independently. Unsupported transactions are
/// collected rather than failing the conversion.
pub fn convert_txs(txs: impl IntoIterator<Item = BrokerageTx>) -> ConvertResult {
    let mut result = ConvertResult::default();
    for tx in txs {
        match classify_tx(tx) {
            Ok(ctx) => result.records.push(tx_to_qif_record(&ctx)),
            Err(unsupported) => {
                tracing::debug!("convert_txs: {}", unsupported);
                result.skipped.push(unsupported);
            }
        }
    }
    result
}

pub fn convert_export(export: BrokerageExport) -> ConvertResult {
    convert_txs(export.transactions)
}

/// Renders the full QIF document. Lines are joined with "\n", with no
/// trailing newline.
pub fn render_qif(records: &[QifRecord]) -> String {
    std::iter::once(INVESTMENT_ACCOUNT_HEADER.to_string())
        .chain(
            records
                .iter()
                .flat_map(|r| r.lines.iter().map(|l| l.to_string())),
        )
        .join("\n")
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::brokerage::{BrokerageExport, BrokerageTx, ClassifiedTx, UnsupportedAction};
    use crate::qif::{QifAction, QifLine};
    use crate::testlib::assert_vec_eq;

    use super::{convert_export, convert_txs, render_qif, tx_to_qif_record};

    fn ctx(action: QifAction) -> ClassifiedTx {
        ClassifiedTx {
            action,
            date: "05/06/2024".to_string(),
            raw_action: "Raw".to_string(),
            description: "DESC".to_string(),
            symbol: "SYM".to_string(),
            quantity: String::new(),
            price: String::new(),
            amount: String::new(),
            commission: String::new(),
        }
    }

    fn rendered_lines(tx: &ClassifiedTx) -> Vec<String> {
        tx_to_qif_record(tx).lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_buy_record() {
        let tx = ClassifiedTx {
            quantity: "10".to_string(),
            price: "$50.00".to_string(),
            amount: "$500.00".to_string(),
            ..ctx(QifAction::Buy)
        };
        let record = tx_to_qif_record(&tx);
        assert_eq!(record.action, QifAction::Buy);
        assert_vec_eq(record.lines, vec![
            QifLine::Date("05/06/2024".to_string()),
            QifLine::Action(QifAction::Buy),
            QifLine::Memo("DESC".to_string()),
            QifLine::Payee("DESC-SYM-Raw".to_string()),
            QifLine::Quantity(dec!(10)),
            QifLine::Price(dec!(50)),
            QifLine::Amount(dec!(-500)),
            QifLine::Total(dec!(-500)),
            QifLine::Commission(None),
            QifLine::End,
        ]);
    }

    #[test]
    fn test_buy_amount_negated() {
        let tx = ClassifiedTx { amount: "$100.00".to_string(), ..ctx(QifAction::Buy) };
        let lines = rendered_lines(&tx);
        assert!(lines.contains(&"U-100".to_string()));
        assert!(lines.contains(&"T-100".to_string()));

        // Only buys
        let tx = ClassifiedTx { amount: "$100.00".to_string(), ..ctx(QifAction::Sell) };
        let lines = rendered_lines(&tx);
        assert!(lines.contains(&"U100".to_string()));
        assert!(lines.contains(&"T100".to_string()));

        // A negative buy amount becomes positive
        let tx = ClassifiedTx { amount: "-$12.34".to_string(), ..ctx(QifAction::Buy) };
        assert!(rendered_lines(&tx).contains(&"U12.34".to_string()));
    }

    #[test]
    fn test_payee_only_actions() {
        for action in [QifAction::MiscIncome, QifAction::Dividend] {
            let tx = ClassifiedTx { amount: "$1.50".to_string(), ..ctx(action) };
            assert_vec_eq(rendered_lines(&tx), vec![
                "D05/06/2024".to_string(),
                action.qif_str().to_string(),
                "PDESC-SYM-Raw".to_string(),
                "U1.5".to_string(),
                "T1.5".to_string(),
                "O0.00".to_string(),
                "^".to_string(),
            ]);
        }
    }

    #[test]
    fn test_memo_omitted_for_empty_description() {
        let tx = ClassifiedTx { description: String::new(), ..ctx(QifAction::Sell) };
        assert_vec_eq(rendered_lines(&tx), vec![
            "D05/06/2024".to_string(),
            "NSell".to_string(),
            "P-SYM-Raw".to_string(),
            "O0.00".to_string(),
            "^".to_string(),
        ]);
    }

    #[test]
    fn test_cash_transfer_in() {
        let tx = ClassifiedTx {
            amount: "$2,000.00".to_string(),
            commission: "$0.00".to_string(),
            ..ctx(QifAction::CashTransferIn)
        };
        assert_vec_eq(rendered_lines(&tx), vec![
            "D05/06/2024".to_string(),
            "NXIn".to_string(),
            "PDESC-SYM-Raw".to_string(),
            "U2000".to_string(),
            "T2000".to_string(),
            "$2000".to_string(),
            "L[InvestmentMatchingTransactionsFromPast]".to_string(),
            "O0".to_string(),
            "^".to_string(),
        ]);

        // No amount, no transfer lines
        let tx = ctx(QifAction::CashTransferIn);
        assert_vec_eq(rendered_lines(&tx), vec![
            "D05/06/2024".to_string(),
            "NXIn".to_string(),
            "PDESC-SYM-Raw".to_string(),
            "O0.00".to_string(),
            "^".to_string(),
        ]);
    }

    #[test]
    fn test_malformed_numbers_are_zero() {
        let tx = ClassifiedTx {
            quantity: "n/a".to_string(),
            price: "abc".to_string(),
            amount: "--".to_string(),
            commission: "free".to_string(),
            ..ctx(QifAction::Sell)
        };
        assert_vec_eq(rendered_lines(&tx), vec![
            "D05/06/2024".to_string(),
            "NSell".to_string(),
            "YDESC".to_string(),
            "PDESC-SYM-Raw".to_string(),
            "Q0".to_string(),
            "I0".to_string(),
            "U0".to_string(),
            "T0".to_string(),
            "O0".to_string(),
            "^".to_string(),
        ]);
    }

    #[test]
    fn test_convert_skips_unsupported() {
        let tx = |action: &str| BrokerageTx {
            date: "01/01/2024".to_string(),
            action: action.to_string(),
            amount: "$1.00".to_string(),
            ..Default::default()
        };
        let res = convert_txs(vec![
            tx("Sell"), tx("Stock Split"), tx("Bank Interest"), tx("Options Frwd Split"),
        ]);
        assert_eq!(res.records.len(), 2);
        assert_eq!(res.records[0].action, QifAction::Sell);
        assert_eq!(res.records[1].action, QifAction::MiscIncome);
        assert_vec_eq(res.skipped, vec![
            UnsupportedAction { raw_action: "Stock Split".to_string() },
            UnsupportedAction { raw_action: "Options Frwd Split".to_string() },
        ]);
    }

    #[test]
    fn test_render_empty() {
        let res = convert_export(BrokerageExport::default());
        assert!(res.records.is_empty());
        assert!(res.skipped.is_empty());
        assert_eq!(render_qif(&res.records), "!Type:Invst");
    }

    #[test]
    fn test_end_to_end_buy() {
        let export: BrokerageExport = serde_json::from_str(r#"{"BrokerageTransactions":[{"Date":"01/02/2023","Action":"Buy","Description":"EXAMPLE FUND","Symbol":"EXF","Quantity":"10","Price":"$50.00","Amount":"$500.00"}]}"#).unwrap();
        let res = convert_export(export);
        assert_eq!(render_qif(&res.records), "\
!Type:Invst
D01/02/2023
NBuy
YEXAMPLE FUND
PEXAMPLE FUND-EXF-Buy
Q10
I50
U-500
T-500
O0.00
^");
    }

    #[test]
    fn test_unquoted_zero_quantity_is_unset() {
        let export: BrokerageExport = serde_json::from_str(
            r#"{"BrokerageTransactions":[{"Action":"Security Transfer","Quantity":0}]}"#,
        ).unwrap();
        let res = convert_export(export);
        assert_eq!(render_qif(&res.records), "\
!Type:Invst
D
NMiscInc
P--Security Transfer
O0.00
^");
    }

    #[test]
    fn test_journaled_interest_end_to_end() {
        let res = convert_txs(vec![BrokerageTx {
            date: "02/01/2024".to_string(),
            action: "Journaled Shares".to_string(),
            description: "CASH ALTERNATIVES INTEREST (MMDA2)".to_string(),
            quantity: "3.21".to_string(),
            ..Default::default()
        }]);
        assert_eq!(render_qif(&res.records), "\
!Type:Invst
D02/01/2024
NMiscInc
PCASH ALTERNATIVES INTEREST (MMDA2)--Journaled Shares
U3.21
T3.21
O0.00
^");
    }
}
