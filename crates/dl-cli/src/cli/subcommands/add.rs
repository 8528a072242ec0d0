use clap::Subcommand;

/// Typed record forms.
#[derive(Clone, Debug, Subcommand)]
pub enum AddCommands {
    /// Add a customer.
    Customer {
        #[arg(long)]
        name: String,
        /// Customer code; generated as CUST-nnnn when omitted.
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long, default_value = "Active")]
        status: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add an inventory item.
    Inventory {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        product_name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        current_stock: i64,
        #[arg(long, default_value_t = 0)]
        reorder_point: i64,
        #[arg(long, default_value_t = 0.0)]
        unit_cost: f64,
        #[arg(long, default_value_t = 0.0)]
        unit_price: f64,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Add an employee.
    Employee {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Employee code; generated as EMP-nnnn when omitted.
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// YYYY-MM-DD.
        #[arg(long)]
        hire_date: Option<String>,
        #[arg(long)]
        salary: Option<f64>,
        #[arg(long)]
        manager_id: Option<i64>,
    },
    /// Add a deal.
    Deal {
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: f64,
        #[arg(long, default_value = "Lead")]
        stage: String,
        #[arg(long)]
        customer_id: Option<i64>,
        #[arg(long, default_value_t = 0)]
        probability: i64,
        /// YYYY-MM-DD.
        #[arg(long)]
        close_date: Option<String>,
        #[arg(long)]
        sales_rep: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add a pending invoice.
    Invoice {
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        amount: f64,
        /// YYYY-MM-DD; defaults to today.
        #[arg(long)]
        invoice_date: Option<String>,
        /// YYYY-MM-DD; defaults to 30 days after the invoice date.
        #[arg(long)]
        due_date: Option<String>,
        /// Invoice number; generated as INV-nnnn when omitted.
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        customer_email: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Record an expense.
    Expense {
        #[arg(long)]
        category: String,
        #[arg(long)]
        amount: f64,
        /// YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// Expense code; generated as EXP-nnnn when omitted.
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },    /// Open a chart-of-accounts entry at a zero balance.
    Account {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        /// Assets, Liabilities, Equity, Revenue, or Expenses.
        #[arg(long = "type")]
        account_type: String,
    },
    /// Add a sales lead.
    Lead {
        #[arg(long)]
        name: String,
        /// Lead code; generated as LEAD-nnnn when omitted.
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        source: Option<String>,
        /// 0 to 100.
        #[arg(long, default_value_t = 50)]
        score: i64,
        /// High, Medium, or Low.
        #[arg(long)]
        interest: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}
