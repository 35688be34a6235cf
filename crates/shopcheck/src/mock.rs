//! In-memory model of the Swag Labs storefront.
//!
//! [`MockStorefront`] implements [`WebDriver`] over a small DOM rendered from
//! the shop state (screen, session, cart, sort order, form fields). It answers
//! the same locators the page objects use, so every scenario can run without a
//! browser. Supported selectors:
//!
//! - id and class-name locators
//! - CSS `tag[attr=value]`, `tag[attr^=value]` and `tag[attr~=value]`
//! - the structural XPath `//div[text()='NAME']/ancestor::div[@class='C']//button`
//!
//! Anything else is a driver error, so a typo in a locator fails loudly
//! instead of silently matching nothing.

use crate::driver::{DriverProvider, ElementHandle, WebDriver};
use crate::locator::{product_slug, Locator, Strategy};
use crate::pages::SortOrder;
use crate::price::Price;
use crate::result::{SuiteError, SuiteResult};
use async_trait::async_trait;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Shared password of the demo accounts
pub const PASSWORD: &str = "secret_sauce";

/// Accounts that can sign in
pub const ACCEPTED_USERS: &[&str] = &[
    "standard_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

/// Account that is refused with a lock-out message
pub const LOCKED_USER: &str = "locked_out_user";

/// Sales tax rate applied at checkout
pub const TAX_RATE_PERCENT: u64 = 8;

/// One product of the storefront catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Numeric id used in the details URL
    pub id: u32,
    /// Display name
    pub name: &'static str,
    /// Description text
    pub description: &'static str,
    /// Unit price
    pub price: Price,
}

/// The six products, in name order
pub const CATALOG: [CatalogItem; 6] = [
    CatalogItem {
        id: 4,
        name: "Sauce Labs Backpack",
        description: "carry.allTheThings() with the sleek, streamlined Sly Pack that melds uncompromising style with unequaled laptop and tablet protection.",
        price: Price::from_cents(2999),
    },
    CatalogItem {
        id: 0,
        name: "Sauce Labs Bike Light",
        description: "A red light isn't the desired state in testing but it sure helps when riding your bike at night. Water-resistant with 3 lighting modes, 1 AAA battery included.",
        price: Price::from_cents(999),
    },
    CatalogItem {
        id: 1,
        name: "Sauce Labs Bolt T-Shirt",
        description: "Get your testing superhero on with the Sauce Labs bolt T-shirt. From American Apparel, 100% ringspun combed cotton, heather gray with red bolt.",
        price: Price::from_cents(1599),
    },
    CatalogItem {
        id: 5,
        name: "Sauce Labs Fleece Jacket",
        description: "It's not every day that you come across a midweight quarter-zip fleece jacket capable of handling everything from a relaxing day outdoors to a busy day at the office.",
        price: Price::from_cents(4999),
    },
    CatalogItem {
        id: 2,
        name: "Sauce Labs Onesie",
        description: "Rib snap infant onesie for the junior automation engineer in development. Reinforced 3-snap bottom closure, two-needle hemmed sleeved and bottom won't unravel.",
        price: Price::from_cents(799),
    },
    CatalogItem {
        id: 3,
        name: "Test.allTheThings() T-Shirt (Red)",
        description: "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard to automate a few tests. Super-soft and comfy ringspun combed cotton.",
        price: Price::from_cents(1599),
    },
];

const COMPLETE_TEXT: &str =
    "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-in form
    Login,
    /// Product listing
    Inventory,
    /// Details of the catalog entry at this index
    Product(usize),
    /// Cart contents
    Cart,
    /// Checkout information form
    CheckoutInfo,
    /// Checkout overview
    CheckoutOverview,
    /// Order confirmation
    CheckoutComplete,
}

impl Screen {
    fn path(self) -> String {
        match self {
            Self::Login => String::new(),
            Self::Inventory => "inventory.html".to_string(),
            Self::Product(i) => format!("inventory-item.html?id={}", CATALOG[i].id),
            Self::Cart => "cart.html".to_string(),
            Self::CheckoutInfo => "checkout-step-one.html".to_string(),
            Self::CheckoutOverview => "checkout-step-two.html".to_string(),
            Self::CheckoutComplete => "checkout-complete.html".to_string(),
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_start_matches('/');
        if let Some(id) = path.strip_prefix("inventory-item.html?id=") {
            let id: u32 = id.parse().ok()?;
            return CATALOG
                .iter()
                .position(|item| item.id == id)
                .map(Self::Product);
        }
        match path {
            "" | "index.html" => Some(Self::Login),
            "inventory.html" => Some(Self::Inventory),
            "cart.html" => Some(Self::Cart),
            "checkout-step-one.html" => Some(Self::CheckoutInfo),
            "checkout-step-two.html" => Some(Self::CheckoutOverview),
            "checkout-complete.html" => Some(Self::CheckoutComplete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Login,
    DismissError,
    AddToCart(usize),
    Remove(usize),
    OpenProduct(usize),
    OpenCart,
    OpenMenu,
    Logout,
    ContinueShopping,
    Checkout,
    ContinueCheckout,
    Cancel,
    Finish,
    BackHome,
}

#[derive(Debug, Clone)]
struct Node {
    tag: &'static str,
    id: Option<String>,
    classes: Vec<&'static str>,
    data_test: Option<String>,
    text: String,
    displayed: bool,
    container: Option<(&'static str, usize)>,
    action: Action,
}

impl Node {
    fn new(tag: &'static str, text: impl Into<String>) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            data_test: None,
            text: text.into(),
            displayed: true,
            container: None,
            action: Action::None,
        }
    }

    fn id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.data_test = Some(id.clone());
        self.id = Some(id);
        self
    }

    fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    fn data_test(mut self, value: &str) -> Self {
        self.data_test = Some(value.to_string());
        self
    }

    const fn shown(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    const fn within(mut self, container: &'static str, product: usize) -> Self {
        self.container = Some((container, product));
        self
    }

    const fn on_click(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    fn attr(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "data-test" => self.data_test.clone(),
            "class" => Some(self.classes.join(" ")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Prefix,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    Id(String),
    Class(String),
    Css {
        tag: Option<String>,
        attr: Option<(String, AttrOp, String)>,
    },
    Structural {
        name: String,
        container: String,
    },
}

impl Query {
    fn parse(locator: &Locator) -> SuiteResult<Self> {
        let selector = locator.selector();
        let parsed = match locator.strategy() {
            Strategy::Id => Some(Self::Id(selector.to_string())),
            Strategy::ClassName => Some(Self::Class(selector.to_string())),
            Strategy::CssSelector => parse_css(selector),
            Strategy::XPath => parse_structural(selector)?,
        };
        parsed.ok_or_else(|| {
            SuiteError::driver(format!("mock storefront cannot evaluate {locator}"))
        })
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Id(id) => node.id.as_deref() == Some(id.as_str()),
            Self::Class(class) => node.classes.contains(&class.as_str()),
            Self::Css { tag, attr } => {
                if tag.as_deref().is_some_and(|t| t != node.tag) {
                    return false;
                }
                let Some((name, op, value)) = attr else {
                    return true;
                };
                let Some(actual) = node.attr(name) else {
                    return false;
                };
                match op {
                    AttrOp::Equals => actual == *value,
                    AttrOp::Prefix => actual.starts_with(value.as_str()),
                    AttrOp::Word => actual.split_whitespace().any(|w| w == value),
                }
            }
            Self::Structural { name, container } => {
                node.tag == "button"
                    && node
                        .container
                        .is_some_and(|(class, i)| class == container && CATALOG[i].name == name)
            }
        }
    }
}

fn parse_css(selector: &str) -> Option<Query> {
    let (tag, rest) = match selector.find('[') {
        Some(i) => (&selector[..i], &selector[i..]),
        None => (selector, ""),
    };
    if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let tag = (!tag.is_empty()).then(|| tag.to_string());
    if rest.is_empty() {
        return tag.map(|t| Query::Css {
            tag: Some(t),
            attr: None,
        });
    }

    let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
    let eq = inner.find('=')?;
    let (name, op) = match inner[..eq].chars().last()? {
        '^' => (&inner[..eq - 1], AttrOp::Prefix),
        '~' => (&inner[..eq - 1], AttrOp::Word),
        _ => (&inner[..eq], AttrOp::Equals),
    };
    let value = unquote(inner[eq + 1..].trim())?;
    Some(Query::Css {
        tag,
        attr: Some((name.trim().to_string(), op, value)),
    })
}

fn unquote(raw: &str) -> Option<String> {
    let quote = raw.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = raw.strip_prefix(quote)?.strip_suffix(quote)?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn parse_structural(selector: &str) -> SuiteResult<Option<Query>> {
    let pattern = Regex::new(
        r"^//div\[text\(\)='([^']*)'\]/ancestor::div\[@class='([^']*)'\]//button$",
    )
    .map_err(|e| SuiteError::driver(e.to_string()))?;
    Ok(pattern.captures(selector).map(|caps| Query::Structural {
        name: caps[1].to_string(),
        container: caps[2].to_string(),
    }))
}

fn listing(order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..CATALOG.len()).collect();
    indices.sort_by_key(|&i| CATALOG[i].name);
    match order {
        SortOrder::NameAsc => {}
        SortOrder::NameDesc => indices.reverse(),
        SortOrder::PriceLowHigh => indices.sort_by_key(|&i| CATALOG[i].price),
        SortOrder::PriceHighLow => indices.sort_by_key(|&i| Reverse(CATALOG[i].price)),
    }
    indices
}

#[derive(Debug)]
struct Store {
    screen: Screen,
    logged_in: bool,
    cart: Vec<usize>,
    sort: SortOrder,
    menu_open: bool,
    error: Option<String>,
    fields: HashMap<String, String>,
    changed_at: Instant,
    call_history: Vec<String>,
}

impl Store {
    fn field(&self, id: &str) -> &str {
        self.fields.get(id).map_or("", String::as_str)
    }

    fn goto(&mut self, screen: Screen) {
        self.screen = screen;
        self.menu_open = false;
        self.error = None;
        self.changed_at = Instant::now();
    }

    fn subtotal(&self) -> Price {
        self.cart.iter().map(|&i| CATALOG[i].price).sum()
    }

    fn login(&mut self) {
        let user = self.field("user-name").to_string();
        let password = self.field("password").to_string();
        let error = if user.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if password != PASSWORD {
            Some("Epic sadface: Username and password do not match any user in this service")
        } else if user == LOCKED_USER {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else if ACCEPTED_USERS.contains(&user.as_str()) {
            None
        } else {
            Some("Epic sadface: Username and password do not match any user in this service")
        };
        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.logged_in = true;
                self.goto(Screen::Inventory);
            }
        }
    }

    fn continue_checkout(&mut self) {
        let missing = [
            ("first-name", "Error: First Name is required"),
            ("last-name", "Error: Last Name is required"),
            ("postal-code", "Error: Postal Code is required"),
        ]
        .into_iter()
        .find(|(field, _)| self.field(field).is_empty());
        match missing {
            Some((_, message)) => self.error = Some(message.to_string()),
            None => self.goto(Screen::CheckoutOverview),
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Login => self.login(),
            Action::DismissError => self.error = None,
            Action::AddToCart(i) => {
                if !self.cart.contains(&i) {
                    self.cart.push(i);
                }
            }
            Action::Remove(i) => self.cart.retain(|&c| c != i),
            Action::OpenProduct(i) => self.goto(Screen::Product(i)),
            Action::OpenCart => self.goto(Screen::Cart),
            Action::OpenMenu => self.menu_open = true,
            Action::Logout => {
                self.logged_in = false;
                self.fields.clear();
                self.goto(Screen::Login);
            }
            Action::ContinueShopping | Action::BackHome => self.goto(Screen::Inventory),
            Action::Checkout => {
                for field in ["first-name", "last-name", "postal-code"] {
                    self.fields.remove(field);
                }
                self.goto(Screen::CheckoutInfo);
            }
            Action::ContinueCheckout => self.continue_checkout(),
            Action::Cancel => match self.screen {
                Screen::CheckoutInfo => self.goto(Screen::Cart),
                _ => self.goto(Screen::Inventory),
            },
            Action::Finish => {
                self.cart.clear();
                self.goto(Screen::CheckoutComplete);
            }
        }
    }

    fn render(&self) -> Vec<Node> {
        let mut nodes = vec![Node::new("body", "")];
        if self.screen == Screen::Login {
            self.render_login(&mut nodes);
            return nodes;
        }
        self.render_header(&mut nodes);
        match self.screen {
            Screen::Login => {}
            Screen::Inventory => self.render_inventory(&mut nodes),
            Screen::Product(i) => self.render_product(i, &mut nodes),
            Screen::Cart => {
                nodes.push(Node::new("span", "Your Cart").class("title"));
                self.render_cart_items(true, &mut nodes);
                nodes.push(
                    Node::new("button", "Continue Shopping")
                        .id("continue-shopping")
                        .on_click(Action::ContinueShopping),
                );
                nodes.push(
                    Node::new("button", "Checkout")
                        .id("checkout")
                        .on_click(Action::Checkout),
                );
            }
            Screen::CheckoutInfo => {
                nodes.push(Node::new("span", "Checkout: Your Information").class("title"));
                for field in ["first-name", "last-name", "postal-code"] {
                    nodes.push(Node::new("input", "").id(field));
                }
                self.render_error(&mut nodes);
                nodes.push(
                    Node::new("input", "")
                        .id("continue")
                        .on_click(Action::ContinueCheckout),
                );
                nodes.push(Node::new("button", "Cancel").id("cancel").on_click(Action::Cancel));
            }
            Screen::CheckoutOverview => {
                nodes.push(Node::new("span", "Checkout: Overview").class("title"));
                self.render_cart_items(false, &mut nodes);
                let subtotal = self.subtotal();
                let tax = subtotal.percent(TAX_RATE_PERCENT);
                nodes.push(
                    Node::new("div", format!("Item total: {subtotal}"))
                        .class("summary_subtotal_label"),
                );
                nodes.push(Node::new("div", format!("Tax: {tax}")).class("summary_tax_label"));
                nodes.push(
                    Node::new("div", format!("Total: {}", subtotal + tax))
                        .class("summary_total_label"),
                );
                nodes.push(Node::new("button", "Cancel").id("cancel").on_click(Action::Cancel));
                nodes.push(Node::new("button", "Finish").id("finish").on_click(Action::Finish));
            }
            Screen::CheckoutComplete => {
                nodes.push(Node::new("span", "Checkout: Complete!").class("title"));
                nodes.push(Node::new("img", "").class("pony_express"));
                nodes.push(Node::new("h2", "Thank you for your order!").class("complete-header"));
                nodes.push(Node::new("div", COMPLETE_TEXT).class("complete-text"));
                nodes.push(
                    Node::new("button", "Back Home")
                        .id("back-to-products")
                        .on_click(Action::BackHome),
                );
            }
        }
        nodes
    }

    fn render_login(&self, nodes: &mut Vec<Node>) {
        nodes.push(Node::new("div", "Swag Labs").class("login_logo"));
        nodes.push(Node::new("input", "").id("user-name"));
        nodes.push(Node::new("input", "").id("password"));
        self.render_error(nodes);
        nodes.push(
            Node::new("input", "")
                .id("login-button")
                .on_click(Action::Login),
        );
    }

    fn render_error(&self, nodes: &mut Vec<Node>) {
        if let Some(ref error) = self.error {
            nodes.push(Node::new("h3", error.as_str()).data_test("error"));
            nodes.push(
                Node::new("button", "")
                    .class("error-button")
                    .data_test("error-button")
                    .on_click(Action::DismissError),
            );
        }
    }

    fn render_header(&self, nodes: &mut Vec<Node>) {
        nodes.push(Node::new("div", "Swag Labs").class("app_logo"));
        nodes.push(
            Node::new("button", "Open Menu")
                .id("react-burger-menu-btn")
                .on_click(Action::OpenMenu),
        );
        nodes.push(
            Node::new("a", "Logout")
                .id("logout_sidebar_link")
                .class("bm-item")
                .shown(self.menu_open)
                .on_click(Action::Logout),
        );
        nodes.push(
            Node::new("a", "")
                .class("shopping_cart_link")
                .on_click(Action::OpenCart),
        );
        if !self.cart.is_empty() {
            nodes.push(Node::new("span", self.cart.len().to_string()).class("shopping_cart_badge"));
        }
    }

    fn render_inventory(&self, nodes: &mut Vec<Node>) {
        nodes.push(Node::new("span", "Products").class("title"));
        nodes.push(
            Node::new("select", "")
                .class("product_sort_container")
                .data_test("product-sort-container"),
        );
        for i in listing(self.sort) {
            let item = &CATALOG[i];
            nodes.push(Node::new("div", "").class("inventory_item").within("inventory_item", i));
            nodes.push(
                Node::new("div", item.name)
                    .class("inventory_item_name")
                    .within("inventory_item", i)
                    .on_click(Action::OpenProduct(i)),
            );
            nodes.push(
                Node::new("div", item.description)
                    .class("inventory_item_desc")
                    .within("inventory_item", i),
            );
            nodes.push(
                Node::new("div", item.price.to_string())
                    .class("inventory_item_price")
                    .within("inventory_item", i),
            );
            nodes.push(self.cart_button(i, true).within("inventory_item", i));
        }
    }

    fn render_product(&self, i: usize, nodes: &mut Vec<Node>) {
        let item = &CATALOG[i];
        nodes.push(
            Node::new("button", "Back to products")
                .id("back-to-products")
                .on_click(Action::BackHome),
        );
        nodes.push(Node::new("img", "").class("inventory_details_img"));
        nodes.push(Node::new("div", item.name).class("inventory_details_name"));
        nodes.push(Node::new("div", item.description).class("inventory_details_desc"));
        nodes.push(Node::new("div", item.price.to_string()).class("inventory_details_price"));
        nodes.push(self.cart_button(i, false));
    }

    fn render_cart_items(&self, removable: bool, nodes: &mut Vec<Node>) {
        for &i in &self.cart {
            let item = &CATALOG[i];
            nodes.push(Node::new("div", "").class("cart_item").within("cart_item", i));
            nodes.push(Node::new("div", "1").class("cart_quantity").within("cart_item", i));
            nodes.push(
                Node::new("div", item.name)
                    .class("inventory_item_name")
                    .within("cart_item", i)
                    .on_click(Action::OpenProduct(i)),
            );
            nodes.push(
                Node::new("div", item.price.to_string())
                    .class("inventory_item_price")
                    .within("cart_item", i),
            );
            if removable {
                nodes.push(
                    Node::new("button", "Remove")
                        .id(format!("remove-{}", product_slug(item.name)))
                        .class("cart_button")
                        .within("cart_item", i)
                        .on_click(Action::Remove(i)),
                );
            }
        }
    }

    /// Listing buttons carry the product slug; the details page uses bare ids.
    fn cart_button(&self, i: usize, listing: bool) -> Node {
        let in_cart = self.cart.contains(&i);
        let (prefix, text, action) = if in_cart {
            ("remove", "Remove", Action::Remove(i))
        } else {
            ("add-to-cart", "Add to cart", Action::AddToCart(i))
        };
        let id = if listing {
            format!("{prefix}-{}", product_slug(CATALOG[i].name))
        } else {
            prefix.to_string()
        };
        Node::new("button", text)
            .id(id)
            .class("btn_inventory")
            .on_click(action)
    }
}

/// In-memory storefront driver
#[derive(Debug)]
pub struct MockStorefront {
    base_url: String,
    transition: Duration,
    store: Mutex<Store>,
}

impl MockStorefront {
    /// Storefront served at `base_url`, initially blank on the login screen
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transition: Duration::ZERO,
            store: Mutex::new(Store {
                screen: Screen::Login,
                logged_in: false,
                cart: Vec::new(),
                sort: SortOrder::NameAsc,
                menu_open: false,
                error: None,
                fields: HashMap::new(),
                changed_at: Instant::now(),
                call_history: Vec::new(),
            }),
        }
    }

    /// Delay before a new screen's content is present
    #[must_use]
    pub const fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Screen currently shown
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.store().screen
    }

    /// Product names in the cart, in insertion order
    #[must_use]
    pub fn cart_names(&self) -> Vec<&'static str> {
        self.store().cart.iter().map(|&i| CATALOG[i].name).collect()
    }

    /// Calls received so far
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.store().call_history.clone()
    }

    fn visible_nodes(&self, store: &Store) -> Vec<Node> {
        let nodes = store.render();
        if store.changed_at.elapsed() < self.transition {
            nodes.into_iter().filter(|n| n.tag == "body").collect()
        } else {
            nodes
        }
    }

    fn resolve(&self, store: &Store, element: &ElementHandle) -> SuiteResult<Node> {
        let query = Query::parse(&element.locator)?;
        self.visible_nodes(store)
            .into_iter()
            .filter(|n| query.matches(n))
            .nth(element.index)
            .ok_or_else(|| SuiteError::StaleElement {
                locator: element.locator.to_string(),
                index: element.index,
            })
    }

    fn input_id(node: &Node, element: &ElementHandle) -> SuiteResult<String> {
        match (node.tag, &node.id) {
            ("input", Some(id)) => Ok(id.clone()),
            _ => Err(SuiteError::driver(format!(
                "{} is not a text input",
                element.locator
            ))),
        }
    }

    fn url_of(&self, screen: Screen) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), screen.path())
    }
}

#[async_trait]
impl WebDriver for MockStorefront {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        let mut store = self.store();
        store.call_history.push(format!("navigate:{url}"));
        let base = self.base_url.trim_end_matches('/');
        let screen = url
            .strip_prefix(base)
            .and_then(Screen::from_path)
            .ok_or_else(|| SuiteError::Navigation {
                url: url.to_string(),
                message: "not a storefront page".to_string(),
            })?;
        if screen == Screen::Login || store.logged_in {
            store.goto(screen);
        } else {
            let path = screen.path();
            let page = path.split('?').next().unwrap_or_default().to_string();
            store.goto(Screen::Login);
            store.error = Some(format!(
                "Epic sadface: You can only access '/{page}' when you are logged in."
            ));
        }
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> SuiteResult<Vec<ElementHandle>> {
        let query = Query::parse(locator)?;
        let store = self.store();
        Ok(self
            .visible_nodes(&store)
            .into_iter()
            .filter(|n| query.matches(n))
            .enumerate()
            .map(|(index, n)| ElementHandle {
                locator: locator.clone(),
                index,
                text: n.text,
                displayed: n.displayed,
                enabled: true,
            })
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> SuiteResult<()> {
        let mut store = self.store();
        let node = self.resolve(&store, element)?;
        store
            .call_history
            .push(format!("click:{}[{}]", element.locator, element.index));
        store.apply(node.action);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> SuiteResult<()> {
        let mut store = self.store();
        let node = self.resolve(&store, element)?;
        let id = Self::input_id(&node, element)?;
        store.fields.insert(id, String::new());
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()> {
        let mut store = self.store();
        let node = self.resolve(&store, element)?;
        let id = Self::input_id(&node, element)?;
        store
            .call_history
            .push(format!("send_keys:{}", element.locator));
        store.fields.entry(id).or_default().push_str(text);
        Ok(())
    }

    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> SuiteResult<()> {
        let mut store = self.store();
        let node = self.resolve(&store, element)?;
        if !node.classes.contains(&"product_sort_container") {
            return Err(SuiteError::driver(format!(
                "{} is not a select",
                element.locator
            )));
        }
        store.sort = SortOrder::from_value(value).ok_or_else(|| {
            SuiteError::driver(format!("no option with value {value:?}"))
        })?;
        store.call_history.push(format!("select:{value}"));
        Ok(())
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        let mut store = self.store();
        store.call_history.push("screenshot".to_string());
        let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
        png.extend_from_slice(self.url_of(store.screen).as_bytes());
        Ok(png)
    }

    async fn current_url(&self) -> SuiteResult<String> {
        Ok(self.url_of(self.store().screen))
    }

    async fn title(&self) -> SuiteResult<String> {
        Ok("Swag Labs".to_string())
    }

    async fn quit(&self) -> SuiteResult<()> {
        self.store().call_history.push("quit".to_string());
        Ok(())
    }
}

/// Hands out a fresh [`MockStorefront`] per test
#[derive(Debug, Clone)]
pub struct MockProvider {
    base_url: String,
    transition: Duration,
}

impl MockProvider {
    /// Storefronts served at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transition: Duration::ZERO,
        }
    }

    /// Screen transition delay for every storefront
    #[must_use]
    pub const fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }
}

#[async_trait]
impl DriverProvider for MockProvider {
    async fn get_driver(&self, _headless: bool) -> SuiteResult<Box<dyn WebDriver>> {
        Ok(Box::new(
            MockStorefront::new(self.base_url.clone()).with_transition(self.transition),
        ))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
