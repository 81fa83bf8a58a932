#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;
use library_service::book::errors::BookError;
use library_service::book::models::Book;
use library_service::book::models::BookDetails;
use library_service::book::models::BookId;
use library_service::book::ports::BookRepository;
use library_service::book::ports::BookServicePort;
use library_service::borrow::errors::BorrowError;
use library_service::borrow::models::Borrow;
use library_service::borrow::models::BorrowId;
use library_service::borrow::ports::BorrowRepository;
use library_service::bootstrap::ensure_admin;
use library_service::config::BootstrapConfig;
use library_service::domain::auth::service::AuthenticationService;
use library_service::domain::book::service::BookService;
use library_service::domain::borrow::service::BorrowService;
use library_service::domain::principal::service::PrincipalService;
use library_service::inbound::http::router::create_router;
use library_service::inbound::http::router::AppState;
use library_service::principal::errors::PrincipalError;
use library_service::principal::models::Principal;
use library_service::principal::models::PrincipalId;
use library_service::principal::models::Username;
use library_service::principal::ports::PrincipalRepository;
use library_service::principal::ports::PrincipalServicePort;
use library_service::principal::ports::PrincipalStore;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "librarian";
pub const ADMIN_PASSWORD: &str = "shelve_it!";
pub const READER_USERNAME: &str = "reader";
pub const READER_PASSWORD: &str = "page_turner!";

/// Administrator seeded the same way the server bootstraps one.
pub fn bootstrap_config() -> BootstrapConfig {
    BootstrapConfig {
        admin_username: ADMIN_USERNAME.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        admin_name: "Head Librarian".to_string(),
    }
}

/// In-memory principal storage keyed by id.
#[derive(Default)]
pub struct InMemoryPrincipalRepository {
    principals: Mutex<HashMap<PrincipalId, Principal>>,
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Principal>, PrincipalError> {
        let principals = self.principals.lock().unwrap();
        Ok(principals
            .values()
            .find(|p| p.username == *username)
            .cloned())
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalError> {
        Ok(self.principals.lock().unwrap().get(id).cloned())
    }
}

#[async_trait]
impl PrincipalRepository for InMemoryPrincipalRepository {
    async fn create(&self, principal: Principal) -> Result<Principal, PrincipalError> {
        let mut principals = self.principals.lock().unwrap();
        if principals
            .values()
            .any(|p| p.username == principal.username)
        {
            return Err(PrincipalError::UsernameAlreadyExists(
                principal.username.as_str().to_string(),
            ));
        }
        principals.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn list_all(&self) -> Result<Vec<Principal>, PrincipalError> {
        Ok(self.principals.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, principal: Principal) -> Result<Principal, PrincipalError> {
        let mut principals = self.principals.lock().unwrap();
        if !principals.contains_key(&principal.id) {
            return Err(PrincipalError::NotFound(principal.id.to_string()));
        }
        principals.insert(principal.id, principal.clone());
        Ok(principal)
    }
}

#[derive(Default)]
pub struct InMemoryBookRepository {
    books: Mutex<HashMap<BookId, Book>>,
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: Book) -> Result<Book, BookError> {
        self.books.lock().unwrap().insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookError> {
        Ok(self.books.lock().unwrap().get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookError> {
        let mut books: Vec<Book> = self.books.lock().unwrap().values().cloned().collect();
        books.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(books)
    }

    async fn update(&self, book: Book) -> Result<Book, BookError> {
        let mut books = self.books.lock().unwrap();
        if !books.contains_key(&book.id) {
            return Err(BookError::NotFound(book.id.to_string()));
        }
        books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: &BookId) -> Result<(), BookError> {
        self.books
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(BookError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryBorrowRepository {
    borrows: Mutex<Vec<Borrow>>,
}

#[async_trait]
impl BorrowRepository for InMemoryBorrowRepository {
    async fn create(&self, borrow: Borrow) -> Result<Borrow, BorrowError> {
        self.borrows.lock().unwrap().push(borrow.clone());
        Ok(borrow)
    }

    async fn find_by_id(&self, id: &BorrowId) -> Result<Option<Borrow>, BorrowError> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == *id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Borrow>, BorrowError> {
        Ok(self.borrows.lock().unwrap().clone())
    }

    async fn find_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<Borrow>, BorrowError> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.principal_id == *principal_id)
            .cloned()
            .collect())
    }

    async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<Borrow>, BorrowError> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.book_id == *book_id)
            .cloned()
            .collect())
    }

    async fn update(&self, borrow: Borrow) -> Result<Borrow, BorrowError> {
        let mut borrows = self.borrows.lock().unwrap();
        let slot = borrows
            .iter_mut()
            .find(|b| b.id == borrow.id)
            .ok_or(BorrowError::NotFound(borrow.id.to_string()))?;
        *slot = borrow.clone();
        Ok(borrow)
    }
}

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub codec: TokenCodec,
    pub admin: Principal,
    pub reader: Principal,
    pub book_service: Arc<dyn BookServicePort>,
    pub principal_service: Arc<dyn PrincipalServicePort>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let principal_repository = Arc::new(InMemoryPrincipalRepository::default());
        let book_repository = Arc::new(InMemoryBookRepository::default());
        let borrow_repository = Arc::new(InMemoryBorrowRepository::default());

        let authenticator = Arc::new(Authenticator::new(
            TokenCodec::with_defaults(TEST_SECRET).expect("Failed to create token codec"),
        ));

        let principal_service = Arc::new(PrincipalService::new(
            Arc::clone(&principal_repository),
            Arc::clone(&authenticator),
        ));
        let book_service: Arc<dyn BookServicePort> =
            Arc::new(BookService::new(Arc::clone(&book_repository)));

        let admin = ensure_admin(principal_service.as_ref(), &bootstrap_config())
            .await
            .expect("Failed to seed admin")
            .expect("Admin already present in a fresh store");

        let reader = principal_service
            .register(
                Username::new(READER_USERNAME.to_string()).unwrap(),
                "Avid Reader".to_string(),
                READER_PASSWORD.to_string(),
            )
            .await
            .expect("Failed to seed reader");

        let state = AppState {
            auth_service: Arc::new(AuthenticationService::new(
                Arc::clone(&principal_repository),
                authenticator,
            )),
            principal_service: principal_service.clone(),
            book_service: Arc::clone(&book_service),
            borrow_service: Arc::new(BorrowService::new(
                borrow_repository,
                book_repository,
                principal_repository,
            )),
        };

        let router = create_router(state);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            codec: TokenCodec::with_defaults(TEST_SECRET).expect("Failed to create token codec"),
            admin,
            reader,
            book_service,
            principal_service,
        }
    }

    /// Issue a fresh token for a principal without going through login
    pub fn token_for(&self, principal: &Principal) -> String {
        self.codec
            .issue(&principal.id.to_string(), Utc::now())
            .expect("Failed to create test token")
    }

    /// Issue a token whose validity window already closed
    pub fn expired_token_for(&self, principal: &Principal) -> String {
        let issued = Utc::now() - Duration::hours(6);
        self.codec
            .encode(&Claims::new(
                principal.id.to_string(),
                issued,
                Duration::hours(5),
            ))
            .expect("Failed to create expired token")
    }

    /// Seed a book directly through the service
    pub async fn seed_book(&self, name: &str, copies: i32) -> Book {
        self.book_service
            .create_book(
                BookDetails::new(
                    name.to_string(),
                    "Frank Herbert".to_string(),
                    "Science Fiction".to_string(),
                    copies,
                )
                .expect("Invalid book details"),
            )
            .await
            .expect("Failed to seed book")
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(&format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.put(path).bearer_auth(token)
    }
}
