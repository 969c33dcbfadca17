use axum::http::StatusCode;
use comanda_backend::{config::AppState, router, MIGRATOR};
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use uuid::Uuid;

// Os testes de integração sobem o servidor real contra um banco
// descartável. Sem TEST_DATABASE_URL no ambiente, são pulados.
struct TestServer {
    base: String,
    client: Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Option<Self> {
        let admin_url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("Pulando teste: TEST_DATABASE_URL não definida");
                return None;
            }
        };

        let (addr, handle) = start_server(&admin_url).await;
        Some(Self {
            base: format!("http://{}", addr),
            client: Client::new(),
            handle,
        })
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let url = format!("{}{}", self.base, path);
        let mut req = match method {
            "GET" => self.client.get(&url),
            "POST" => self.client.post(&url),
            "PUT" => self.client.put(&url),
            other => panic!("método não suportado: {other}"),
        };
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req.send().await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        let text = resp.text().await.unwrap();
        let val = if text.is_empty() {
            json!(null)
        } else {
            serde_json::from_str(&text).unwrap_or(json!({ "raw": text }))
        };
        (status, val)
    }

    async fn request_expect(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Value {
        let (status, value) = self.request(method, path, token, body).await;
        assert_eq!(
            status, expected,
            "{method} {path} retornou {status:?} com corpo {value:?}",
        );
        value
    }

    /// Cadastra um funcionário e devolve o token dele.
    async fn register(&self, username: &str, role: &str) -> String {
        let body = self
            .request_expect(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "displayName": username,
                    "password": "senha123",
                    "role": role,
                })),
                StatusCode::CREATED,
            )
            .await;
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// Cria um banco descartável a partir da URL administrativa, roda as
// migrações e sobe o router completo em uma porta efêmera.
async fn start_server(admin_url: &str) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let db_name = format!("comanda_test_{}", Uuid::new_v4().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(admin_url)
        .await
        .expect("banco administrativo");
    sqlx::query(&format!(r#"CREATE DATABASE "{}""#, db_name))
        .execute(&admin_pool)
        .await
        .expect("criar banco de teste");
    admin_pool.close().await;

    let test_url = match admin_url.rsplit_once('/') {
        Some((prefix, _)) => format!("{}/{}", prefix, db_name),
        None => panic!("TEST_DATABASE_URL inesperada"),
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("banco de teste");
    MIGRATOR.run(&pool).await.expect("migrações");

    let state = AppState::from_parts(pool, "segredo-de-teste".into());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

#[tokio::test]
async fn login_checks_password_role_and_activity() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };

    server
        .request_expect("GET", "/api/health", None, None, StatusCode::OK)
        .await;

    server.register("rosa", "cashier").await;

    // Senha e papel corretos
    let body = server
        .request_expect(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "rosa", "password": "senha123", "role": "cashier"})),
            StatusCode::OK,
        )
        .await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], "rosa");

    // Senha errada
    server
        .request_expect(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "rosa", "password": "senha errada", "role": "cashier"})),
            StatusCode::UNAUTHORIZED,
        )
        .await;

    // Papel errado
    server
        .request_expect(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "rosa", "password": "senha123", "role": "manager"})),
            StatusCode::UNAUTHORIZED,
        )
        .await;

    // Sem token, rotas protegidas respondem 401
    server
        .request_expect("GET", "/api/auth/user", None, None, StatusCode::UNAUTHORIZED)
        .await;
    server
        .request_expect("GET", "/api/tables", None, None, StatusCode::UNAUTHORIZED)
        .await;
}

#[tokio::test]
async fn role_matrix_is_enforced() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };

    let manager = server.register("gerente", "manager").await;
    let cashier = server.register("caixa", "cashier").await;
    let waiter = server.register("garcom", "server").await;

    // Garçom não abre turno
    server
        .request_expect(
            "POST",
            "/api/sessions",
            Some(&waiter),
            Some(json!({"shiftType": "morning"})),
            StatusCode::FORBIDDEN,
        )
        .await;

    // Caixa não cadastra produto
    server
        .request_expect(
            "POST",
            "/api/products",
            Some(&cashier),
            Some(json!({"categoryId": Uuid::new_v4(), "name": "x", "price": 1.0})),
            StatusCode::FORBIDDEN,
        )
        .await;

    // Gerente não abre comanda
    server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&manager),
            Some(json!({"tableId": Uuid::new_v4(), "items": [{"productId": Uuid::new_v4(), "quantity": 1}]})),
            StatusCode::FORBIDDEN,
        )
        .await;

    // Gerente não registra pagamento
    server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&manager),
            Some(json!({"orderId": Uuid::new_v4(), "method": "cash", "amount": 1.0})),
            StatusCode::FORBIDDEN,
        )
        .await;
}

#[tokio::test]
async fn full_shift_order_and_payment_flow() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };

    let manager = server.register("gerente", "manager").await;
    let cashier = server.register("caixa", "cashier").await;
    let waiter = server.register("garcom", "server").await;

    // Gerente monta o salão e o catálogo
    let table = server
        .request_expect(
            "POST",
            "/api/tables",
            Some(&manager),
            Some(json!({"number": 1, "capacity": 4})),
            StatusCode::CREATED,
        )
        .await;
    let table_id = table["id"].as_str().unwrap().to_string();
    assert_eq!(table["status"], "free");

    let category = server
        .request_expect(
            "POST",
            "/api/categories",
            Some(&manager),
            Some(json!({"name": "Cervejas"})),
            StatusCode::CREATED,
        )
        .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let beer = server
        .request_expect(
            "POST",
            "/api/products",
            Some(&manager),
            Some(json!({
                "categoryId": category_id,
                "name": "Cerveja artesanal",
                "price": 12.0,
                "stockQuantity": 10,
                "minStockLevel": 2,
            })),
            StatusCode::CREATED,
        )
        .await;
    let beer_id = beer["id"].as_str().unwrap().to_string();

    let soldout = server
        .request_expect(
            "POST",
            "/api/products",
            Some(&manager),
            Some(json!({
                "categoryId": category_id,
                "name": "Vinho esgotado",
                "price": 50.0,
                "stockQuantity": 0,
            })),
            StatusCode::CREATED,
        )
        .await;
    let soldout_id = soldout["id"].as_str().unwrap().to_string();

    // Sem turno aberto, comanda é rejeitada
    server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({"tableId": table_id, "items": [{"productId": beer_id, "quantity": 1}]})),
            StatusCode::CONFLICT,
        )
        .await;

    // Caixa abre o turno; o segundo pedido é rejeitado
    let session = server
        .request_expect(
            "POST",
            "/api/sessions",
            Some(&cashier),
            Some(json!({"shiftType": "evening"})),
            StatusCode::CREATED,
        )
        .await;
    let session_id = session["id"].as_str().unwrap().to_string();
    server
        .request_expect(
            "POST",
            "/api/sessions",
            Some(&cashier),
            Some(json!({"shiftType": "evening"})),
            StatusCode::CONFLICT,
        )
        .await;

    // Produto sem estoque não entra em comanda (e nada é gravado)
    server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({"tableId": table_id, "items": [{"productId": soldout_id, "quantity": 1}]})),
            StatusCode::CONFLICT,
        )
        .await;
    let tables = server
        .request_expect("GET", "/api/tables", Some(&waiter), None, StatusCode::OK)
        .await;
    assert_eq!(tables[0]["status"], "free");

    // Comanda válida: 3 cervejas a 12.00
    let order = server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({
                "tableId": table_id,
                "items": [{"productId": beer_id, "quantity": 3}],
                "notes": "sem espuma",
            })),
            StatusCode::CREATED,
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["totalAmount"].as_f64().unwrap(), 36.0);

    // Mesa ocupada e apontando para a comanda
    let tables = server
        .request_expect("GET", "/api/tables", Some(&waiter), None, StatusCode::OK)
        .await;
    assert_eq!(tables[0]["status"], "occupied");
    assert_eq!(tables[0]["currentOrderId"], order_id.as_str());

    // Mesa ocupada não recebe segunda comanda
    server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({"tableId": table_id, "items": [{"productId": beer_id, "quantity": 1}]})),
            StatusCode::CONFLICT,
        )
        .await;

    // Round-trip: item hidratado com totalPrice = quantidade x preço
    let detail = server
        .request_expect(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(&waiter),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(detail["items"][0]["quantity"], 3);
    assert_eq!(detail["items"][0]["totalPrice"].as_f64().unwrap(), 36.0);
    assert_eq!(detail["items"][0]["productName"], "Cerveja artesanal");

    // Estoque baixou de 10 para 7
    let products = server
        .request_expect("GET", "/api/products", Some(&waiter), None, StatusCode::OK)
        .await;
    let beer_row = products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == beer_id.as_str())
        .unwrap();
    assert_eq!(beer_row["stockQuantity"], 7);

    // Cozinha avança o status
    server
        .request_expect(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&cashier),
            Some(json!({"status": "preparing"})),
            StatusCode::OK,
        )
        .await;
    // Voltar para pending é inválido
    server
        .request_expect(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&cashier),
            Some(json!({"status": "pending"})),
            StatusCode::CONFLICT,
        )
        .await;

    // Pagamento parcial: comanda segue aberta, mesa segue ocupada
    let partial = server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&cashier),
            Some(json!({"orderId": order_id, "method": "mobile_money", "amount": 16.0})),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(partial["isPartial"], true);

    let detail = server
        .request_expect(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(&cashier),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(detail["status"], "preparing");

    // Quitação em dinheiro com troco: comanda completa, mesa livre
    let settle = server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&cashier),
            Some(json!({"orderId": order_id, "method": "cash", "amount": 20.0, "receivedAmount": 50.0})),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(settle["isPartial"], false);
    assert_eq!(settle["changeAmount"].as_f64().unwrap(), 30.0);

    let detail = server
        .request_expect(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(&cashier),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(detail["status"], "completed");

    let tables = server
        .request_expect("GET", "/api/tables", Some(&cashier), None, StatusCode::OK)
        .await;
    assert_eq!(tables[0]["status"], "free");
    assert!(tables[0]["currentOrderId"].is_null());

    // Comanda fechada não aceita mais pagamento
    server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&cashier),
            Some(json!({"orderId": order_id, "method": "cash", "amount": 1.0})),
            StatusCode::CONFLICT,
        )
        .await;

    // Extrato do turno lista os dois pagamentos na ordem de entrada
    let ledger = server
        .request_expect(
            "GET",
            &format!("/api/sessions/{session_id}/payments"),
            Some(&cashier),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(ledger.as_array().unwrap().len(), 2);
    assert_eq!(ledger[0]["method"], "mobile_money");
    assert_eq!(ledger[1]["method"], "cash");

    // Estatísticas do turno refletem os dois pagamentos
    let stats = server
        .request_expect(
            "GET",
            &format!("/api/sessions/{session_id}/stats"),
            Some(&cashier),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(stats["totalSales"].as_f64().unwrap(), 36.0);
    assert_eq!(stats["transactionCount"], 2);
    assert_eq!(stats["totalTables"], 1);
    assert_eq!(stats["occupiedTables"], 0);

    // Encerrar congela os totais; repetir é 409
    let closed = server
        .request_expect(
            "POST",
            &format!("/api/sessions/{session_id}/end"),
            Some(&cashier),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(closed["isActive"], false);
    assert_eq!(closed["totalSales"].as_f64().unwrap(), 36.0);
    assert_eq!(closed["transactionCount"], 2);
    assert!(!closed["endTime"].is_null());

    server
        .request_expect(
            "POST",
            &format!("/api/sessions/{session_id}/end"),
            Some(&cashier),
            None,
            StatusCode::CONFLICT,
        )
        .await;
}

#[tokio::test]
async fn credit_lifecycle_respects_limit_and_debt() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };

    let manager = server.register("gerente", "manager").await;
    let cashier = server.register("caixa", "cashier").await;
    let waiter = server.register("garcom", "server").await;

    let table = server
        .request_expect(
            "POST",
            "/api/tables",
            Some(&manager),
            Some(json!({"number": 7, "capacity": 2})),
            StatusCode::CREATED,
        )
        .await;
    let table_id = table["id"].as_str().unwrap().to_string();

    let category = server
        .request_expect(
            "POST",
            "/api/categories",
            Some(&manager),
            Some(json!({"name": "Petiscos"})),
            StatusCode::CREATED,
        )
        .await;
    let product = server
        .request_expect(
            "POST",
            "/api/products",
            Some(&manager),
            Some(json!({
                "categoryId": category["id"],
                "name": "Porção de fritas",
                "price": 40.0,
                "stockQuantity": 20,
            })),
            StatusCode::CREATED,
        )
        .await;
    let product_id = product["id"].as_str().unwrap().to_string();

    server
        .request_expect(
            "POST",
            "/api/sessions",
            Some(&cashier),
            Some(json!({"shiftType": "morning"})),
            StatusCode::CREATED,
        )
        .await;

    // Garçom cadastra o cliente fiado com limite de 100
    let client = server
        .request_expect(
            "POST",
            "/api/credit-clients",
            Some(&waiter),
            Some(json!({"name": "Dona Marta", "creditLimit": 100.0})),
            StatusCode::CREATED,
        )
        .await;
    let client_id = client["id"].as_str().unwrap().to_string();
    assert_eq!(client["totalCredit"].as_f64().unwrap(), 0.0);

    // Comanda de 40 paga no fiado: saldo devedor sobe para 40
    let order = server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({"tableId": table_id, "items": [{"productId": product_id, "quantity": 1}]})),
            StatusCode::CREATED,
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    // Fiado sem cliente é erro de validação
    server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&cashier),
            Some(json!({"orderId": order_id, "method": "credit", "amount": 40.0})),
            StatusCode::BAD_REQUEST,
        )
        .await;

    server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&cashier),
            Some(json!({
                "orderId": order_id,
                "method": "credit",
                "amount": 40.0,
                "creditClientId": client_id,
            })),
            StatusCode::CREATED,
        )
        .await;

    let clients = server
        .request_expect("GET", "/api/credit-clients", Some(&cashier), None, StatusCode::OK)
        .await;
    assert_eq!(clients[0]["totalCredit"].as_f64().unwrap(), 40.0);

    // Segunda comanda de 80 estouraria o limite de 100: 409 e saldo intacto
    let order2 = server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({"tableId": table_id, "items": [{"productId": product_id, "quantity": 2}]})),
            StatusCode::CREATED,
        )
        .await;
    server
        .request_expect(
            "POST",
            "/api/payments",
            Some(&cashier),
            Some(json!({
                "orderId": order2["id"],
                "method": "credit",
                "amount": 80.0,
                "creditClientId": client_id,
            })),
            StatusCode::CONFLICT,
        )
        .await;
    let clients = server
        .request_expect("GET", "/api/credit-clients", Some(&cashier), None, StatusCode::OK)
        .await;
    assert_eq!(clients[0]["totalCredit"].as_f64().unwrap(), 40.0);

    // Abatimento de 30 em dinheiro: saldo cai para 10
    server
        .request_expect(
            "POST",
            &format!("/api/credit-clients/{client_id}/payments"),
            Some(&cashier),
            Some(json!({"method": "cash", "amount": 30.0})),
            StatusCode::CREATED,
        )
        .await;
    let clients = server
        .request_expect("GET", "/api/credit-clients", Some(&cashier), None, StatusCode::OK)
        .await;
    assert_eq!(clients[0]["totalCredit"].as_f64().unwrap(), 10.0);

    // Abater mais do que deve é rejeitado
    server
        .request_expect(
            "POST",
            &format!("/api/credit-clients/{client_id}/payments"),
            Some(&cashier),
            Some(json!({"method": "cash", "amount": 20.0})),
            StatusCode::BAD_REQUEST,
        )
        .await;

    // Abatimento "no fiado" não existe
    server
        .request_expect(
            "POST",
            &format!("/api/credit-clients/{client_id}/payments"),
            Some(&cashier),
            Some(json!({"method": "credit", "amount": 5.0})),
            StatusCode::BAD_REQUEST,
        )
        .await;
}

#[tokio::test]
async fn cancelling_order_restores_stock_and_frees_table() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };

    let manager = server.register("gerente", "manager").await;
    let cashier = server.register("caixa", "cashier").await;
    let waiter = server.register("garcom", "server").await;

    let table = server
        .request_expect(
            "POST",
            "/api/tables",
            Some(&manager),
            Some(json!({"number": 3, "capacity": 6})),
            StatusCode::CREATED,
        )
        .await;
    let category = server
        .request_expect(
            "POST",
            "/api/categories",
            Some(&manager),
            Some(json!({"name": "Sucos"})),
            StatusCode::CREATED,
        )
        .await;
    let product = server
        .request_expect(
            "POST",
            "/api/products",
            Some(&manager),
            Some(json!({
                "categoryId": category["id"],
                "name": "Suco de laranja",
                "price": 8.0,
                "stockQuantity": 5,
                "minStockLevel": 4,
            })),
            StatusCode::CREATED,
        )
        .await;
    let product_id = product["id"].as_str().unwrap().to_string();

    server
        .request_expect(
            "POST",
            "/api/sessions",
            Some(&cashier),
            Some(json!({"shiftType": "evening"})),
            StatusCode::CREATED,
        )
        .await;

    let order = server
        .request_expect(
            "POST",
            "/api/orders",
            Some(&waiter),
            Some(json!({"tableId": table["id"], "items": [{"productId": product_id, "quantity": 2}]})),
            StatusCode::CREATED,
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    // Com 3 de 5 em estoque e limiar 4, o suco aparece no estoque baixo
    let low = server
        .request_expect(
            "GET",
            "/api/products/low-stock",
            Some(&manager),
            None,
            StatusCode::OK,
        )
        .await;
    assert!(low
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == product_id.as_str()));

    // Cancelar devolve o estoque e libera a mesa
    server
        .request_expect(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&cashier),
            Some(json!({"status": "cancelled"})),
            StatusCode::OK,
        )
        .await;

    let products = server
        .request_expect("GET", "/api/products", Some(&cashier), None, StatusCode::OK)
        .await;
    let row = products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == product_id.as_str())
        .unwrap();
    assert_eq!(row["stockQuantity"], 5);

    let tables = server
        .request_expect("GET", "/api/tables", Some(&cashier), None, StatusCode::OK)
        .await;
    assert_eq!(tables[0]["status"], "free");

    // Comanda cancelada é terminal
    server
        .request_expect(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&cashier),
            Some(json!({"status": "preparing"})),
            StatusCode::CONFLICT,
        )
        .await;
}
