//! The fixed seed set written by `LogContract::init_ledger`.

use logbook_contracts::record::LogRecord;

/// The six audit events every fresh ledger starts with, in write order.
pub fn seed_logs() -> Vec<LogRecord> {
    vec![
        LogRecord::new(
            "log1",
            "2020-06-25 01:53:37",
            "mailsv1",
            "guest",
            "access denied",
            20,
            "168.156.11.24",
        ),
        LogRecord::new(
            "log2",
            "2020-08-19 16:51:15",
            "mailsv1",
            "guest",
            "access denied",
            22,
            "168.156.11.24",
        ),
        LogRecord::new(
            "log3",
            "2020-06-06 18:57:31",
            "websv2",
            "guest",
            "access denied",
            80,
            "168.156.11.24",
        ),
        LogRecord::new(
            "log4",
            "2021-04-04 21:47:12",
            "mailsv1",
            "guest",
            "access denied",
            20,
            "168.156.11.24",
        ),
        LogRecord::new(
            "log5",
            "2022-04-08 05:12:14",
            "mailsv1",
            "guest",
            "access denied",
            20,
            "168.156.11.24",
        ),
        LogRecord::new(
            "log6",
            "2024-05-06 10:28:58",
            "mailsv1",
            "guest",
            "access denied",
            20,
            "168.156.11.24",
        ),
    ]
}
