use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use intersul_backoffice::config::{AdminBootstrap, EnvironmentConfig};
use intersul_backoffice::repositories::MemoryStore;
use intersul_backoffice::services::TokenType;
use intersul_backoffice::{create_router, AppState};

const ADMIN_PASSWORD: &str = "troque-esta-senha";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let config = EnvironmentConfig {
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        };
        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        state
            .accounts()
            .bootstrap_superuser(&AdminBootstrap {
                username: "admin".to_string(),
                password: ADMIN_PASSWORD.to_string(),
                email: "admin@example.com".to_string(),
            })
            .await
            .unwrap();

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    async fn login(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .post("/login/", None, json!({"username": username, "password": password}))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body
    }

    async fn admin_token(&self) -> String {
        self.login("admin", ADMIN_PASSWORD).await["access"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn create_customer(&self, token: &str, nome: &str) -> i64 {
        let (status, body) = self
            .post(
                "/clientes/",
                Some(token),
                json!({"nome": nome, "cnpj": "12.345.678/0001-90", "como_conheceu": "G"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create customer failed: {}", body);
        body["id"].as_i64().unwrap()
    }
}

fn location(usuario_id: i64, cidade: &str) -> Value {
    json!({
        "cliente": true,
        "usuario_id": usuario_id,
        "uf": "SP",
        "cidade": cidade,
        "bairro": "Centro",
        "logradouro": "Rua X",
        "numero": 10,
        "cep": "01000-000"
    })
}

#[tokio::test]
async fn test_public_endpoints() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(Method::GET, "/site/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site_header"], "InterSul cópias");
    assert_eq!(body["index_title"], "Painel Administrativo");
}

#[tokio::test]
async fn test_collections_require_token() {
    let app = TestApp::new().await;

    for uri in ["/clientes/", "/funcionarios/", "/copiadoras/", "/franquias/", "/copiadora-clientes/", "/ufs/"] {
        let (status, _) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _) = app.get("/clientes/", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.admin_token().await;
    let (status, body) = app.get("/clientes/", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_login_and_refresh() {
    let app = TestApp::new().await;

    let tokens = app.login("admin", ADMIN_PASSWORD).await;
    assert_eq!(tokens["access"], tokens["access_token"]);
    assert_eq!(tokens["refresh"], tokens["refresh_token"]);

    let claims = app
        .state
        .jwt
        .verify(tokens["access"].as_str().unwrap(), TokenType::Access)
        .unwrap();
    assert_eq!(claims.nome, "admin");
    assert!(claims.admin);

    let (status, body) = app
        .post("/refresh-token/", None, json!({"refresh": tokens["refresh"]}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/clientes/", body["access"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/refresh-token/", None, json!({"refresh": tokens["access"]}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/login/", None, json!({"username": "admin", "password": "errada-123"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_location_cascade() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let maria = app.create_customer(&token, "Maria").await;
    let joao = app.create_customer(&token, "João").await;

    let (status, body) = app.post("/registrar/localizacao/", None, location(maria, "São Paulo")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["endereco"]["bairro"]["cidade"]["uf"]["sigla"], "SP");

    let (status, _) = app.post("/registrar/localizacao/", None, location(joao, "Campinas")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, ufs) = app.get("/ufs/", &token).await;
    let (_, cidades) = app.get("/cidades/", &token).await;
    assert_eq!(ufs.as_array().unwrap().len(), 1);
    assert_eq!(cidades.as_array().unwrap().len(), 2);
    assert!(cidades
        .as_array()
        .unwrap()
        .iter()
        .all(|cidade| cidade["uf"]["id"] == ufs[0]["id"]));

    let (status, customer) = app.get(&format!("/clientes/{}/", joao), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customer["endereco"]["bairro"]["cidade"]["nome"], "Campinas");
    assert_eq!(customer["endereco"]["logradouro"], "Rua X");
}

#[tokio::test]
async fn test_register_location_validates_and_checks_person() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app.post("/registrar/localizacao/", None, location(999, "Campinas")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let maria = app.create_customer(&token, "Maria").await;
    let mut bad = location(maria, "Campinas");
    bad["cep"] = json!("123");
    let (status, body) = app.post("/registrar/localizacao/", None, bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("cep").is_some());

    let (_, ufs) = app.get("/ufs/", &token).await;
    assert_eq!(ufs, json!([]));
}

#[tokio::test]
async fn test_address_is_not_shared_between_customers() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let maria = app.create_customer(&token, "Maria").await;
    let joao = app.create_customer(&token, "João").await;

    let (status, _) = app.post("/registrar/localizacao/", None, location(maria, "Santos")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/registrar/localizacao/", None, location(joao, "Santos")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, customer) = app.get(&format!("/clientes/{}/", joao), &token).await;
    assert_eq!(customer["endereco"], Value::Null);
}

#[tokio::test]
async fn test_address_delete_keeps_person() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let maria = app.create_customer(&token, "Maria").await;

    let (_, body) = app.post("/registrar/localizacao/", None, location(maria, "Santos")).await;
    let address_id = body["endereco"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::DELETE, &format!("/enderecos/{}/", address_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, customer) = app.get(&format!("/clientes/{}/", maria), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customer["endereco"], Value::Null);
}

#[tokio::test]
async fn test_person_requires_tax_id() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app.post("/clientes/", Some(&token), json!({"nome": "Sem documento"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("cpf").is_some());
    assert!(body["details"].get("cnpj").is_some());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/clientes/")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"nome\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_billing_period_total_is_derived() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, period) = app
        .post(
            "/franquias/",
            Some(&token),
            json!({"periodo": 12, "folha": "A4", "quantidade": 100, "preco_unidade": "0.50", "valor": "9999.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", period);
    assert_eq!(period["valor"], "50.00");

    let uri = format!("/franquias/{}/", period["id"]);
    let (status, period) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"quantidade": 300})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(period["valor"], "150.00");
    assert_eq!(period["folha"], "A4");
}

#[tokio::test]
async fn test_copier_instance_flow() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let customer = app.create_customer(&token, "Gráfica Paulista").await;

    let (_, brand) = app.post("/marcas/", Some(&token), json!({"nome": "Ricoh"})).await;
    let (status, _) = app.post("/marcas/", Some(&token), json!({"nome": "Ricoh"})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, feature) = app.post("/funcionalidades/", Some(&token), json!({"nome": "Scanner"})).await;
    let (status, copier) = app
        .post(
            "/copiadoras/",
            Some(&token),
            json!({
                "modelo": "MP 2014",
                "fabricante": "Ricoh",
                "marca": brand["id"],
                "funcionalidades": [feature["id"]],
                "imagens": [{"imagem": "https://cdn.example.com/mp2014.png"}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", copier);
    assert_eq!(copier["marca"]["nome"], "Ricoh");
    assert_eq!(copier["funcionalidades"][0]["nome"], "Scanner");

    let (_, period) = app
        .post(
            "/franquias/",
            Some(&token),
            json!({"periodo": 6, "folha": "A3", "quantidade": 10, "preco_unidade": "1.25"}),
        )
        .await;

    let instance = json!({
        "cliente": customer,
        "copiadora": copier["id"],
        "franquia": period["id"],
        "numero_de_serie": "SN-0001",
        "tipo_aquisicao": "alugada",
        "frequencia_manutencao": 3
    });
    let (status, created) = app.post("/copiadora-clientes/", Some(&token), instance.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["copiadora"]["modelo"], "MP 2014");
    assert_eq!(created["franquia"]["valor"], "12.50");

    let (status, _) = app.post("/copiadora-clientes/", Some(&token), instance).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(Method::DELETE, &format!("/marcas/{}/", brand["id"]), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, instances) = app.get("/copiadora-clientes/", &token).await;
    assert_eq!(instances, json!([]));
}

#[tokio::test]
async fn test_account_linkage_display_name() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let customer = app.create_customer(&token, "Gráfica Paulista").await;

    let account = json!({
        "username": "grafica",
        "password": "copias-2024",
        "email": "contato@grafica.com.br",
        "cliente": true,
        "usuario_id": customer
    });
    let (status, body) = app.post("/register/usuario/", None, account.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["username"], "grafica");

    let (status, _) = app.post("/register/usuario/", None, account).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let tokens = app.login("grafica", "copias-2024").await;
    let claims = app
        .state
        .jwt
        .verify(tokens["access"].as_str().unwrap(), TokenType::Access)
        .unwrap();
    assert_eq!(claims.nome, "Gráfica Paulista");
    assert!(!claims.admin);

    let (_, detail) = app.get(&format!("/clientes/{}/", customer), &token).await;
    assert_eq!(detail["usuario"]["username"], "grafica");
}

#[tokio::test]
async fn test_employee_account_policy() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, technician) = app
        .post(
            "/funcionarios/",
            Some(&admin),
            json!({"nome": "Carlos", "cpf": "123.456.789-00", "setor": "T", "cargo": "Técnico"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", technician);
    let (_, trainee) = app
        .post("/funcionarios/", Some(&admin), json!({"nome": "Bia", "cpf": "987.654.321-00", "setor": "C"}))
        .await;

    let account = |username: &str, id: &Value| {
        json!({
            "username": username,
            "password": "copias-2024",
            "email": format!("{}@intersul.com.br", username),
            "cliente": false,
            "usuario_id": id
        })
    };

    let (status, _) = app.post("/register/usuario/", None, account("carlos", &technician["id"])).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/register/usuario/", Some(&admin), account("carlos", &technician["id"]))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let technician_token = app.login("carlos", "copias-2024").await["access"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = app
        .post("/register/usuario/", Some(&technician_token), account("bia", &trainee["id"]))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/funcionarios/", Some(&technician_token), json!({"nome": "X", "cpf": "1"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app.get("/funcionarios/", &technician_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_put_patch_and_delete_customer() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let id = app.create_customer(&token, "Maria").await;
    let uri = format!("/clientes/{}/", id);

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"telefone": "11 99999-0000"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Maria");
    assert_eq!(body["como_conheceu"], "G");

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({"nome": "Maria S.", "cpf": "123"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["telefone"], Value::Null);
    assert_eq!(body["como_conheceu"], "O");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
