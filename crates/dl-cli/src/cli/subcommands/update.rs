use clap::Subcommand;

/// Stage and status updates.
#[derive(Clone, Debug, Subcommand)]
pub enum UpdateCommands {
    /// Move a deal to another pipeline stage.
    DealStage {
        /// Deal name.
        deal: String,
        /// Lead, Qualified, Proposal, Negotiation, "Closed Won" or "Closed Lost".
        stage: String,
    },
    /// Change a customer's status.
    CustomerStatus {
        /// Customer code (e.g. CUST-0001).
        code: String,
        /// Active, Prospect or Inactive.
        status: String,
    },
    /// Change an invoice's status.
    InvoiceStatus {
        number: String,
        /// Pending, Paid or Overdue.
        status: String,
    },
}
