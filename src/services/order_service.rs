// src/services/order_service.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, OrderRepository, SessionRepository, TableRepository},
    models::{
        auth::User,
        floor::TableStatus,
        orders::{Order, OrderDetail, OrderItem, OrderStatus},
    },
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    catalog_repo: CatalogRepository,
    table_repo: TableRepository,
    session_repo: SessionRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        catalog_repo: CatalogRepository,
        table_repo: TableRepository,
        session_repo: SessionRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            catalog_repo,
            table_repo,
            session_repo,
            pool,
        }
    }

    /// Abre uma comanda: mesa ocupada, itens inseridos com preço
    /// fotografado, estoque baixado e total recalculado, tudo em UMA
    /// transação. Se qualquer passo falhar, nada é aplicado.
    pub async fn place_order(
        &self,
        server: &User,
        table_id: Uuid,
        items: &[(Uuid, i32)],
        notes: Option<&str>,
    ) -> Result<Order, AppError> {
        if items.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        let mut tx = self.pool.begin().await?;

        let table = self
            .table_repo
            .find_by_id(&mut *tx, table_id)
            .await?
            .ok_or(AppError::TableNotFound)?;

        // Mesa livre ou reservada pode receber comanda; ocupada não.
        if table.status == TableStatus::Occupied {
            return Err(AppError::TableOccupied);
        }

        // As vendas são atribuídas ao turno aberto da casa.
        let session = self
            .session_repo
            .get_any_active_session(&mut *tx)
            .await?
            .ok_or(AppError::NoActiveSession)?;

        let mut order = self
            .order_repo
            .create_order(&mut *tx, table_id, server.id, session.id, notes)
            .await?;

        for (product_id, quantity) in items {
            self.add_item_inner(&mut tx, order.id, *product_id, *quantity)
                .await?;
        }

        order.total_amount = self
            .order_repo
            .recalculate_order_total(&mut *tx, order.id)
            .await?;

        self.table_repo
            .update_status(&mut *tx, table_id, TableStatus::Occupied, Some(order.id))
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Acrescenta um item a uma comanda aberta (baixa de estoque e
    /// recálculo do total na mesma transação).
    pub async fn add_item(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<OrderItem, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status.is_terminal() {
            return Err(AppError::OrderAlreadyClosed);
        }

        let item = self
            .add_item_inner(&mut tx, order_id, product_id, quantity)
            .await?;

        self.order_repo
            .recalculate_order_total(&mut *tx, order_id)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    // Validação de produto + baixa de estoque + insert do item.
    // Roda sempre dentro da transação do chamador.
    async fn add_item_inner(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<OrderItem, AppError> {
        let product = self
            .catalog_repo
            .find_product(&mut **tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if !product.is_active {
            return Err(AppError::ProductInactive(product.name));
        }

        let decremented = self
            .catalog_repo
            .decrement_stock(&mut **tx, product_id, quantity)
            .await?;
        if !decremented {
            return Err(AppError::InsufficientStock(product.name));
        }

        self.order_repo
            .add_order_item(&mut **tx, order_id, product_id, quantity, product.price)
            .await
    }

    /// Transição explícita de status. `completed` só existe via
    /// pagamento; cancelar devolve o estoque e libera a mesa.
    pub async fn transition(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if !order.status.can_transition_to(new_status) {
            return Err(AppError::InvalidStatusTransition);
        }

        let closed_at = if new_status == OrderStatus::Cancelled {
            let items = self.order_repo.list_order_items(&mut *tx, order_id).await?;
            for item in &items {
                self.catalog_repo
                    .restore_stock(&mut *tx, item.product_id, item.quantity)
                    .await?;
            }
            self.table_repo
                .update_status(&mut *tx, order.table_id, TableStatus::Free, None)
                .await?;
            Some(Utc::now())
        } else {
            None
        };

        let updated = self
            .order_repo
            .update_status(&mut *tx, order_id, new_status, closed_at)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // ---
    // Leituras hidratadas
    // ---

    pub async fn list_orders(&self) -> Result<Vec<OrderDetail>, AppError> {
        let orders = self.order_repo.list_orders().await?;
        self.hydrate(orders).await
    }

    pub async fn list_pending(&self) -> Result<Vec<OrderDetail>, AppError> {
        let orders = self.order_repo.list_pending_orders().await?;
        self.hydrate(orders).await
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self
            .order_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let mut detail = self.hydrate(vec![order]).await?;
        Ok(detail.remove(0))
    }

    // Uma consulta secundária para o lote inteiro, agrupada em memória.
    async fn hydrate(&self, orders: Vec<Order>) -> Result<Vec<OrderDetail>, AppError> {
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = self.order_repo.list_items_for_orders(&ids).await?;

        let mut by_order: HashMap<Uuid, Vec<_>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderDetail { order, items }
            })
            .collect())
    }
}
