use async_trait::async_trait;

use super::{PersonStore, PgStore};
use crate::models::person::{Customer, CustomerValues, Employee, EmployeeValues, PersonRef};
use crate::utils::errors::{address_in_use_error, is_foreign_key_violation, is_unique_violation, AppError, AppResult};

const CUSTOMER_COLUMNS: &str = "id, account_id, name, phone, cnpj, cpf, how_found, address_id";
const EMPLOYEE_COLUMNS: &str = "id, account_id, name, phone, cnpj, cpf, job_title, department, address_id";

fn map_address_error(e: sqlx::Error, address_id: Option<i64>) -> AppError {
    match address_id {
        Some(id) if is_foreign_key_violation(&e) => {
            AppError::NotFound(format!("Endereço with id '{}' not found", id))
        }
        Some(id) if is_unique_violation(&e) => address_in_use_error(id),
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl PersonStore for PgStore {
    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let query = format!("SELECT {} FROM customers ORDER BY id", CUSTOMER_COLUMNS);
        let customers = sqlx::query_as::<_, Customer>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    async fn find_customer(&self, id: i64) -> AppResult<Option<Customer>> {
        let query = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn find_customer_by_account(&self, account_id: i64) -> AppResult<Option<Customer>> {
        let query = format!("SELECT {} FROM customers WHERE account_id = $1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn create_customer(&self, values: &CustomerValues) -> AppResult<Customer> {
        let query = format!(
            r#"
            INSERT INTO customers (name, phone, cnpj, cpf, how_found, address_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );

        sqlx::query_as::<_, Customer>(&query)
            .bind(&values.name)
            .bind(&values.phone)
            .bind(&values.cnpj)
            .bind(&values.cpf)
            .bind(values.how_found.code())
            .bind(values.address_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_address_error(e, values.address_id))
    }

    async fn update_customer(&self, id: i64, values: &CustomerValues) -> AppResult<Option<Customer>> {
        let query = format!(
            r#"
            UPDATE customers
            SET name = $2, phone = $3, cnpj = $4, cpf = $5, how_found = $6, address_id = $7
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );

        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&values.name)
            .bind(&values.phone)
            .bind(&values.cnpj)
            .bind(&values.cpf)
            .bind(values.how_found.code())
            .bind(values.address_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_address_error(e, values.address_id))
    }

    async fn delete_customer(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let query = format!("SELECT {} FROM employees ORDER BY id", EMPLOYEE_COLUMNS);
        let employees = sqlx::query_as::<_, Employee>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        let query = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_employee_by_account(&self, account_id: i64) -> AppResult<Option<Employee>> {
        let query = format!("SELECT {} FROM employees WHERE account_id = $1", EMPLOYEE_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn create_employee(&self, values: &EmployeeValues) -> AppResult<Employee> {
        let query = format!(
            r#"
            INSERT INTO employees (name, phone, cnpj, cpf, job_title, department, address_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&query)
            .bind(&values.name)
            .bind(&values.phone)
            .bind(&values.cnpj)
            .bind(&values.cpf)
            .bind(&values.job_title)
            .bind(values.department.code())
            .bind(values.address_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_address_error(e, values.address_id))
    }

    async fn update_employee(&self, id: i64, values: &EmployeeValues) -> AppResult<Option<Employee>> {
        let query = format!(
            r#"
            UPDATE employees
            SET name = $2, phone = $3, cnpj = $4, cpf = $5, job_title = $6, department = $7, address_id = $8
            WHERE id = $1
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&values.name)
            .bind(&values.phone)
            .bind(&values.cnpj)
            .bind(&values.cpf)
            .bind(&values.job_title)
            .bind(values.department.code())
            .bind(values.address_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_address_error(e, values.address_id))
    }

    async fn delete_employee(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_person_address(&self, person: PersonRef, address_id: i64) -> AppResult<bool> {
        let query = format!("UPDATE {} SET address_id = $2 WHERE id = $1", person.kind.table());
        let result = sqlx::query(&query)
            .bind(person.id)
            .bind(address_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_address_error(e, Some(address_id)))?;
        Ok(result.rows_affected() > 0)
    }
}
