use chrono::{Days, Local};

use dl_core::entities::{
    NewAccount, NewCustomer, NewDeal, NewEmployee, NewExpense, NewInventoryItem, NewInvoice,
    NewLead,
};
use dl_core::enums::{AccountType, CustomerStatus, DealStage};
use dl_core::navigation::Category;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AddCommands;
use crate::commands::shared::parse::{parse_date, parse_optional_date};
use crate::commands::shared::session::require_category;
use crate::context::AppContext;
use crate::output::output;

/// Days between invoice date and due date when no due date is given.
const DEFAULT_PAYMENT_TERMS_DAYS: u64 = 30;

/// Category whose forms cover `entity`.
const fn category_for(entity: &AddCommands) -> Category {
    match entity {
        AddCommands::Customer { .. } | AddCommands::Deal { .. } | AddCommands::Lead { .. } => {
            Category::Sales
        }
        AddCommands::Inventory { .. } => Category::Logistics,
        AddCommands::Employee { .. } => Category::HumanResources,
        AddCommands::Invoice { .. } | AddCommands::Expense { .. } | AddCommands::Account { .. } => {
            Category::Finance
        }
    }
}

/// Handle `datalink add <entity>`.
pub async fn handle(entity: &AddCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, category_for(entity))?;
    match entity {
        AddCommands::Customer {
            name,
            code,
            email,
            phone,
            company,
            industry,
            status,
            source,
            notes,
        } => {
            let new = NewCustomer {
                code: code.clone(),
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                company: company.clone(),
                industry: industry.clone(),
                status: status.parse::<CustomerStatus>()?,
                source: source.clone(),
                notes: notes.clone(),
            };
            output(&ctx.service.add_customer(&new).await?, flags.format)
        }
        AddCommands::Inventory {
            sku,
            product_name,
            category,
            current_stock,
            reorder_point,
            unit_cost,
            unit_price,
            supplier,
            location,
        } => {
            let new = NewInventoryItem {
                sku: sku.clone(),
                product_name: product_name.clone(),
                category: category.clone(),
                current_stock: *current_stock,
                reorder_point: *reorder_point,
                unit_cost: *unit_cost,
                unit_price: *unit_price,
                supplier: supplier.clone(),
                location: location.clone(),
            };
            output(&ctx.service.add_inventory_item(&new).await?, flags.format)
        }
        AddCommands::Employee {
            first_name,
            last_name,
            code,
            email,
            phone,
            department,
            position,
            hire_date,
            salary,
            manager_id,
        } => {
            let new = NewEmployee {
                code: code.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                department: department.clone(),
                position: position.clone(),
                hire_date: parse_optional_date(hire_date.as_deref(), "hire_date")?,
                salary: *salary,
                manager_id: *manager_id,
            };
            output(&ctx.service.add_employee(&new).await?, flags.format)
        }
        AddCommands::Deal {
            name,
            value,
            stage,
            customer_id,
            probability,
            close_date,
            sales_rep,
            notes,
        } => {
            let new = NewDeal {
                deal_name: name.clone(),
                customer_id: *customer_id,
                value: *value,
                stage: stage.parse::<DealStage>()?,
                probability: *probability,
                close_date: parse_optional_date(close_date.as_deref(), "close_date")?,
                sales_rep: sales_rep.clone(),
                notes: notes.clone(),
            };
            output(&ctx.service.add_deal(&new).await?, flags.format)
        }
        AddCommands::Invoice {
            customer_name,
            amount,
            invoice_date,
            due_date,
            number,
            customer_email,
            description,
        } => {
            let invoice_date = match invoice_date {
                Some(raw) => parse_date(raw, "invoice_date")?,
                None => Local::now().date_naive(),
            };
            let due_date = match due_date {
                Some(raw) => parse_date(raw, "due_date")?,
                None => invoice_date + Days::new(DEFAULT_PAYMENT_TERMS_DAYS),
            };
            let new = NewInvoice {
                invoice_number: number.clone(),
                customer_name: customer_name.clone(),
                customer_email: customer_email.clone(),
                amount: *amount,
                invoice_date,
                due_date,
                description: description.clone(),
            };
            output(&ctx.service.add_invoice(&new).await?, flags.format)
        }
        AddCommands::Expense {
            category,
            amount,
            date,
            code,
            vendor,
            description,
        } => {
            let expense_date = match date {
                Some(raw) => parse_date(raw, "date")?,
                None => Local::now().date_naive(),
            };
            let new = NewExpense {
                code: code.clone(),
                category: category.clone(),
                amount: *amount,
                expense_date,
                vendor: vendor.clone(),
                description: description.clone(),
            };
            output(&ctx.service.add_expense(&new).await?, flags.format)
        }
        AddCommands::Account {
            name,
            code,
            account_type,
        } => {
            let new = NewAccount {
                account_code: code.clone(),
                account_name: name.clone(),
                account_type: account_type.parse::<AccountType>()?,
            };
            output(&ctx.service.add_account(&new).await?, flags.format)
        }
        AddCommands::Lead {
            name,
            code,
            email,
            phone,
            company,
            source,
            score,
            interest,
            notes,
        } => {
            let new = NewLead {
                code: code.clone(),
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                company: company.clone(),
                source: source.clone(),
                score: *score,
                interest_level: interest.clone(),
                notes: notes.clone(),
            };
            output(&ctx.service.add_lead(&new).await?, flags.format)
        }
    }
}
