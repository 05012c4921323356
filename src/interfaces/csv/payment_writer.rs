use crate::domain::payment::Payment;
use crate::error::Result;
use std::io::Write;

/// Writes a trainer's payment listing as CSV.
///
/// Wraps `csv::Writer` over any `Write` sink (stdout, a file, a buffer in
/// tests). One row per payment, header first.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments(mut self, payments: &[Payment]) -> Result<()> {
        self.writer.write_record([
            "id", "client", "routine", "amount", "status", "rail", "seen", "created",
        ])?;
        for payment in payments {
            self.writer.write_record([
                payment.id.to_string(),
                payment.client_id.to_string(),
                payment.routine_id.to_string(),
                payment.amount.value().to_string(),
                payment.status.as_wire().to_string(),
                payment.rail.to_string(),
                if payment.seen { "yes" } else { "no" }.to_string(),
                payment.created_at.to_rfc3339(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
