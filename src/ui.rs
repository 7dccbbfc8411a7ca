//! Server-rendered pages. Each page shares one shell (navbar, cart sidebar,
//! toast) and ships a small script that talks only to this service's /api
//! routes.

pub fn render_home() -> String {
    page("FoodHub", HOME_BODY, HOME_SCRIPT)
}

pub fn render_menu() -> String {
    page("Menu · FoodHub", MENU_BODY, MENU_SCRIPT)
}

pub fn render_checkout() -> String {
    page("Checkout · FoodHub", CHECKOUT_BODY, CHECKOUT_SCRIPT)
}

pub fn render_orders() -> String {
    page("My Orders · FoodHub", ORDERS_BODY, ORDERS_SCRIPT)
}

pub fn render_login(remembered: Option<&str>) -> String {
    page("Login · FoodHub", LOGIN_BODY, LOGIN_SCRIPT)
        .replace("{{REMEMBERED}}", &escape_attr(remembered.unwrap_or("")))
}

pub fn render_register() -> String {
    page("Register · FoodHub", REGISTER_BODY, REGISTER_SCRIPT)
}

pub fn render_admin() -> String {
    page("Admin · FoodHub", ADMIN_BODY, ADMIN_SCRIPT)
}

fn page(title: &str, body: &str, script: &str) -> String {
    SHELL
        .replace("{{TITLE}}", title)
        .replace("{{BODY}}", body)
        .replace("{{SCRIPT}}", script)
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --primary: #ff6b35;
      --ink: #1a1a1a;
      --muted: #7a7a7a;
      --bg: #faf6f1;
      --card: #ffffff;
      --line: #e8e2da;
      --ok: #2e7d32;
      --bad: #c62828;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
    }
    a { color: var(--primary); text-decoration: none; }
    nav {
      position: sticky; top: 0; z-index: 100;
      display: flex; align-items: center; gap: 1.5rem;
      background: var(--card); border-bottom: 1px solid var(--line);
      padding: 0.75rem 1.5rem;
    }
    nav .brand { font-weight: 700; font-size: 1.2rem; color: var(--ink); }
    nav .links { display: flex; gap: 1rem; flex: 1; }
    nav .links a { color: var(--ink); font-weight: 500; }
    nav .links a:hover { color: var(--primary); }
    #userSection { display: flex; align-items: center; gap: 0.75rem; position: relative; }
    .btn-login {
      background: var(--primary); color: white; border: none;
      border-radius: 20px; padding: 0.45rem 1.1rem; font-weight: 600; cursor: pointer;
    }
    .user-info {
      display: flex; align-items: center; gap: 0.5rem; cursor: pointer;
      background: var(--bg); border-radius: 20px; padding: 0.35rem 0.9rem;
    }
    .user-avatar {
      width: 30px; height: 30px; border-radius: 50%;
      background: var(--primary); color: white; font-weight: 700;
      display: flex; align-items: center; justify-content: center; font-size: 0.85rem;
    }
    .user-dropdown {
      position: absolute; right: 0; top: 110%; min-width: 200px;
      background: var(--card); border: 1px solid var(--line); border-radius: 12px;
      box-shadow: 0 8px 24px rgba(0,0,0,0.12); padding: 0.5rem; z-index: 1001;
    }
    .user-dropdown header { padding: 0.6rem 0.8rem; border-bottom: 1px solid var(--line); }
    .user-dropdown header small { color: var(--muted); display: block; }
    .user-dropdown a { display: block; padding: 0.6rem 0.8rem; color: var(--ink); border-radius: 8px; }
    .user-dropdown a:hover { background: var(--bg); color: var(--primary); }
    .cart-button { position: relative; background: none; border: none; font-size: 1.3rem; cursor: pointer; }
    #cartCount {
      position: absolute; top: -6px; right: -10px;
      background: var(--primary); color: white; font-size: 0.7rem; font-weight: 700;
      border-radius: 10px; padding: 1px 6px;
    }
    main { max-width: 1080px; margin: 0 auto; padding: 1.5rem; }
    .card {
      background: var(--card); border: 1px solid var(--line);
      border-radius: 14px; padding: 1.25rem;
    }
    button.primary {
      background: var(--primary); color: white; border: none; border-radius: 10px;
      padding: 0.7rem 1.4rem; font-weight: 600; cursor: pointer;
    }
    button.primary:disabled { opacity: 0.6; cursor: wait; }
    button.ghost {
      background: none; border: 1px solid var(--line); border-radius: 10px;
      padding: 0.5rem 1rem; cursor: pointer;
    }
    button.ghost.active { border-color: var(--primary); color: var(--primary); font-weight: 600; }
    input, select, textarea {
      width: 100%; padding: 0.6rem 0.75rem; border: 1px solid var(--line);
      border-radius: 10px; font: inherit; background: var(--card);
    }
    label { font-weight: 600; font-size: 0.9rem; display: block; margin: 0.75rem 0 0.3rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(230px, 1fr)); gap: 1rem; }
    .product-card { position: relative; cursor: pointer; transition: transform 0.15s ease; }
    .product-card:hover { transform: translateY(-2px); }
    .product-card.out-of-stock { opacity: 0.55; cursor: not-allowed; }
    .product-emoji { font-size: 3rem; }
    .stock-badge { font-size: 0.72rem; font-weight: 700; border-radius: 8px; padding: 2px 8px; }
    .stock-badge.in-stock { background: #e6f4ea; color: var(--ok); }
    .stock-badge.low-stock { background: #fdf3e0; color: #b26a00; }
    .stock-badge.none { background: #fdecea; color: var(--bad); }
    .price { color: var(--primary); font-weight: 700; }
    .muted { color: var(--muted); font-size: 0.85rem; }
    .row { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
    .spread { justify-content: space-between; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 0.55rem 0.6rem; border-bottom: 1px solid var(--line); font-size: 0.9rem; }
    .status-pill { border-radius: 10px; padding: 2px 10px; font-size: 0.78rem; font-weight: 700; background: var(--bg); }
    .modal {
      display: none; position: fixed; inset: 0; z-index: 1000;
      background: rgba(0,0,0,0.45); align-items: center; justify-content: center; padding: 1rem;
    }
    .modal.active { display: flex; }
    .modal .card { width: min(560px, 100%); max-height: 90vh; overflow: auto; }
    .qty { display: flex; align-items: center; gap: 0.4rem; }
    .qty button { width: 30px; height: 30px; border-radius: 8px; border: 1px solid var(--line); background: var(--card); cursor: pointer; }
    .qty input { width: 54px; text-align: center; }
    #cartSidebar {
      position: fixed; top: 0; right: -380px; width: 360px; height: 100vh; z-index: 1002;
      background: var(--card); border-left: 1px solid var(--line);
      display: flex; flex-direction: column; transition: right 0.25s ease;
    }
    #cartSidebar.active { right: 0; }
    #cartSidebar .head { display: flex; justify-content: space-between; padding: 1rem; border-bottom: 1px solid var(--line); }
    #cartContent { flex: 1; overflow: auto; padding: 1rem; }
    .cart-item { display: flex; gap: 0.7rem; align-items: center; padding: 0.6rem 0; border-bottom: 1px solid var(--line); }
    .cart-item .grow { flex: 1; }
    #cartFooter { padding: 1rem; border-top: 1px solid var(--line); }
    .timeline { list-style: none; margin: 0.5rem 0; padding: 0; }
    .timeline li { display: flex; gap: 0.6rem; padding: 0.35rem 0; color: var(--muted); }
    .timeline li::before { content: "○"; }
    .timeline li.completed { color: var(--ok); }
    .timeline li.completed::before { content: "●"; }
    .timeline li.active { color: var(--primary); font-weight: 600; }
    .timeline li.active::before { content: "●"; }
    #toast {
      position: fixed; left: 50%; bottom: 28px; transform: translateX(-50%) translateY(80px);
      background: var(--ink); color: white; border-radius: 12px; padding: 0.7rem 1.3rem;
      opacity: 0; transition: all 0.25s ease; z-index: 2000;
    }
    #toast.show { opacity: 1; transform: translateX(-50%); }
    .msg { display: none; border-radius: 10px; padding: 0.7rem 1rem; margin-top: 0.75rem; }
    .msg.show { display: block; }
    .msg.error { background: #fdecea; color: var(--bad); }
    .msg.success { background: #e6f4ea; color: var(--ok); }
    .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
    .stats .value { font-size: 1.6rem; font-weight: 700; color: var(--primary); }
  </style>
</head>
<body>
  <nav>
    <a class="brand" href="/">FoodHub</a>
    <div class="links">
      <a href="/">Home</a>
      <a href="/menu">Menu</a>
      <a href="/orders">My Orders</a>
    </div>
    <button class="cart-button" onclick="openCartSidebar()" title="Cart">🛒<span id="cartCount">0</span></button>
    <div id="userSection">
      <button class="btn-login" onclick="location.href='/login'">Login</button>
    </div>
  </nav>

  <aside id="cartSidebar">
    <div class="head">
      <strong>Your Cart</strong>
      <button class="ghost" onclick="closeCartSidebar()">✕</button>
    </div>
    <div id="cartContent"></div>
    <div id="cartFooter">
      <div class="row spread"><span>Subtotal</span><strong id="cartSubtotal">$0.00</strong></div>
      <button class="primary" style="width:100%; margin-top:0.7rem;" onclick="goToCheckout()">Checkout</button>
    </div>
  </aside>

  <main>
{{BODY}}
  </main>

  <div id="toast"><span id="toastMessage"></span></div>

  <script>
    const categoryEmoji = (category) => ({
      appetizer: '🥗',
      main_course: '🍔',
      dessert: '🍰',
      beverage: '🥤',
      other: '🍽️'
    }[(category || 'other').toLowerCase()] || '🍽️');

    function escapeHtml(text) {
      const div = document.createElement('div');
      div.textContent = text == null ? '' : text;
      return div.innerHTML;
    }

    function money(value) {
      return '$' + Number(value).toFixed(2);
    }

    let toastTimer = null;
    function showToast(message) {
      const toast = document.getElementById('toast');
      document.getElementById('toastMessage').textContent = message;
      toast.classList.add('show');
      clearTimeout(toastTimer);
      toastTimer = setTimeout(() => toast.classList.remove('show'), 3000);
    }

    async function fetchJson(url, options) {
      const response = await fetch(url, Object.assign({ credentials: 'include' }, options));
      return response.json();
    }

    function postJson(url, body) {
      return fetchJson(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
    }

    function updateCartBadge(count) {
      const badge = document.getElementById('cartCount');
      if (badge) badge.textContent = count;
    }

    async function refreshCart(render) {
      try {
        const data = await fetchJson('/api/cart');
        updateCartBadge(data.itemCount);
        if (render !== false) renderCartItems(data);
        return data;
      } catch (err) {
        return null;
      }
    }

    function renderCartItems(data) {
      const content = document.getElementById('cartContent');
      if (!content) return;
      if (!data.items.length) {
        content.innerHTML = '<p class="muted">Your cart is empty. Add some delicious items to get started!</p>';
        document.getElementById('cartSubtotal').textContent = money(0);
        return;
      }
      content.innerHTML = data.items.map(item => `
        <div class="cart-item">
          <span class="product-emoji">${categoryEmoji(item.category)}</span>
          <div class="grow">
            <strong>${escapeHtml(item.productName)}</strong>
            <div class="muted">${money(item.price)} each</div>
            <div class="qty">
              <button onclick="changeQuantity(${item.productId}, -1)">−</button>
              <input type="number" value="${item.quantity}" readonly>
              <button onclick="changeQuantity(${item.productId}, 1)">+</button>
              <button onclick="removeCartItem(${item.productId})" title="Remove">🗑️</button>
            </div>
          </div>
          <strong>${money(item.price * item.quantity)}</strong>
        </div>
      `).join('');
      document.getElementById('cartSubtotal').textContent = money(data.totals.subtotal);
    }

    async function changeQuantity(productId, delta) {
      const data = await postJson('/api/cart/quantity', { productId, delta });
      updateCartBadge(data.itemCount);
      renderCartItems(data);
      if (data.notice) showToast(data.notice);
      if (typeof onCartChanged === 'function') onCartChanged(data);
    }

    async function removeCartItem(productId) {
      const data = await postJson('/api/cart/remove', { productId });
      updateCartBadge(data.itemCount);
      renderCartItems(data);
      if (data.notice) showToast(data.notice);
      if (typeof onCartChanged === 'function') onCartChanged(data);
    }

    function openCartSidebar() {
      document.getElementById('cartSidebar').classList.add('active');
      refreshCart();
    }

    function closeCartSidebar() {
      document.getElementById('cartSidebar').classList.remove('active');
    }

    async function goToCheckout() {
      const cart = await refreshCart(false);
      if (!cart || !cart.items.length) {
        showToast('Your cart is empty!');
        return;
      }
      const session = await fetchJson('/api/session').catch(() => null);
      if (session && session.loggedIn) {
        location.href = '/checkout';
      } else {
        showToast('Please login to proceed to checkout');
        setTimeout(() => { location.href = '/login?redirect=checkout'; }, 1000);
      }
    }

    async function decorateNavbar() {
      let session = null;
      try {
        session = await fetchJson('/api/session');
      } catch (err) {
        return; // navbar personalization fails open
      }
      if (!session || !session.loggedIn || !session.user) return;
      const userSection = document.getElementById('userSection');
      if (userSection.querySelector('.user-info')) return;
      const loginBtn = userSection.querySelector('.btn-login');
      if (loginBtn) loginBtn.remove();

      const user = session.user;
      const info = document.createElement('div');
      info.className = 'user-info';
      info.innerHTML = `
        <div class="user-avatar">${escapeHtml(user.username.charAt(0).toUpperCase())}</div>
        <span>${escapeHtml(user.username)}</span>
      `;
      info.addEventListener('click', () => toggleUserMenu(user));
      userSection.appendChild(info);
    }

    function toggleUserMenu(user) {
      const existing = document.querySelector('.user-dropdown');
      if (existing) { existing.remove(); return; }
      const dropdown = document.createElement('div');
      dropdown.className = 'user-dropdown';
      dropdown.innerHTML = `
        <header>
          <strong>${escapeHtml(user.fullName || user.username)}</strong>
          <small>${escapeHtml(user.email)}</small>
        </header>
        <a href="/orders">My Orders</a>
        ${user.role === 'admin' ? '<a href="/admin">Admin Panel</a>' : ''}
        <a id="logoutLink" style="cursor:pointer;">Logout</a>
      `;
      document.getElementById('userSection').appendChild(dropdown);
      dropdown.querySelector('#logoutLink').addEventListener('click', async (event) => {
        event.preventDefault();
        try { await postJson('/api/logout', {}); } catch (err) { /* never trap the user */ }
        location.href = '/login';
      });
    }

    document.addEventListener('keydown', (event) => {
      if (event.key === 'Escape') closeCartSidebar();
    });

    decorateNavbar();
    refreshCart(false);
  </script>
  <script>
{{SCRIPT}}
  </script>
</body>
</html>
"#;

const HOME_BODY: &str = r#"
    <section class="card" style="text-align:center; padding:3rem 1.5rem;">
      <h1>Delicious food, delivered fast</h1>
      <p class="muted">Browse the menu, build your cart, and track every order.</p>
      <button class="primary" onclick="location.href='/menu'">Browse Menu</button>
    </section>
"#;

const HOME_SCRIPT: &str = "";

const MENU_BODY: &str = r#"
    <div class="row" style="margin-bottom:1rem;">
      <input id="searchInput" placeholder="Search dishes..." style="max-width:260px;">
      <button class="ghost" id="searchBtn">Search</button>
      <select id="sortSelect" style="max-width:180px;">
        <option value="">Sort: Featured</option>
        <option value="price-low">Price: Low to High</option>
        <option value="price-high">Price: High to Low</option>
        <option value="name">Name</option>
      </select>
    </div>
    <div class="row" id="categoryFilters" style="margin-bottom:1rem;">
      <button class="ghost active" data-category="all">All</button>
      <button class="ghost" data-category="appetizer">Appetizers</button>
      <button class="ghost" data-category="main_course">Mains</button>
      <button class="ghost" data-category="dessert">Desserts</button>
      <button class="ghost" data-category="beverage">Beverages</button>
    </div>
    <p id="fallbackNote" class="muted" style="display:none;">Showing the demo menu while the kitchen is unreachable.</p>
    <div class="grid" id="productsGrid"><p class="muted">Loading menu...</p></div>
    <p id="emptyState" class="muted" style="display:none;">No dishes match your search.</p>

    <div class="modal" id="productModal">
      <div class="card">
        <div class="row spread">
          <h2 id="modalTitle" style="margin:0;"></h2>
          <button class="ghost" onclick="closeProductModal()">✕</button>
        </div>
        <div class="product-emoji" id="modalEmoji" style="font-size:4rem;"></div>
        <p id="modalDescription" class="muted"></p>
        <div class="row spread">
          <span class="price" id="modalPrice"></span>
          <span id="modalStockBadge"></span>
        </div>
        <div class="row spread" style="margin-top:1rem;">
          <div class="qty">
            <button onclick="modalAdjust(-1)">−</button>
            <input type="number" id="modalQuantity" value="1" readonly>
            <button onclick="modalAdjust(1)">+</button>
          </div>
          <button class="primary" id="modalAddToCart">Add to Cart</button>
        </div>
      </div>
    </div>
"#;

const MENU_SCRIPT: &str = r#"
    let currentCategory = 'all';
    let currentSearch = '';
    let currentSort = '';
    let currentProducts = [];
    let modalProduct = null;

    async function loadProducts() {
      const params = new URLSearchParams();
      if (currentCategory !== 'all') params.set('category', currentCategory);
      if (currentSearch) params.set('search', currentSearch);
      if (currentSort) params.set('sort', currentSort);
      const grid = document.getElementById('productsGrid');
      try {
        const data = await fetchJson('/api/products?' + params.toString());
        currentProducts = data.products;
        document.getElementById('fallbackNote').style.display = data.fallback ? 'block' : 'none';
        renderProducts(currentProducts);
      } catch (err) {
        grid.innerHTML = '<p class="muted">Failed to load the menu. Please refresh.</p>';
      }
    }

    function stockBadge(product) {
      if (!product.isAvailable) return '<span class="stock-badge none">Unavailable</span>';
      if (!product.isInStock) return '<span class="stock-badge none">Out of Stock</span>';
      if (product.isLowStock) return '<span class="stock-badge low-stock">Low Stock</span>';
      return '<span class="stock-badge in-stock">In Stock</span>';
    }

    function renderProducts(products) {
      const grid = document.getElementById('productsGrid');
      const empty = document.getElementById('emptyState');
      if (!products.length) {
        grid.innerHTML = '';
        empty.style.display = 'block';
        return;
      }
      empty.style.display = 'none';
      grid.innerHTML = products.map(product => {
        const orderable = product.isAvailable && product.isInStock;
        return `
        <div class="card product-card ${orderable ? '' : 'out-of-stock'}" data-id="${product.productId}">
          <div class="row spread">
            <span class="product-emoji">${categoryEmoji(product.category)}</span>
            ${stockBadge(product)}
          </div>
          <h3 style="margin:0.5rem 0 0.25rem;">${escapeHtml(product.productName)}</h3>
          <p class="muted">${escapeHtml(product.description || 'Delicious and fresh')}</p>
          <div class="row spread">
            <span class="price">${money(product.price)}</span>
            <button class="ghost" ${orderable ? '' : 'disabled'}
                    onclick="event.stopPropagation(); quickAdd(${product.productId})">🛒 Add</button>
          </div>
        </div>`;
      }).join('');

      grid.querySelectorAll('.product-card:not(.out-of-stock)').forEach(card => {
        card.addEventListener('click', () => {
          const product = currentProducts.find(p => p.productId === Number(card.dataset.id));
          if (product) openProductModal(product);
        });
      });
    }

    async function quickAdd(productId) {
      const data = await postJson('/api/cart/add', { productId, quantity: 1 });
      if (data.success === false) {
        showToast(data.message || 'Could not add item');
        return;
      }
      updateCartBadge(data.itemCount);
      if (data.notice) showToast(data.notice);
    }

    function openProductModal(product) {
      modalProduct = product;
      document.getElementById('modalTitle').textContent = product.productName;
      document.getElementById('modalEmoji').textContent = categoryEmoji(product.category);
      document.getElementById('modalDescription').textContent =
        product.description || 'Delicious and freshly prepared with quality ingredients.';
      document.getElementById('modalPrice').textContent = money(product.price);
      document.getElementById('modalStockBadge').innerHTML = stockBadge(product);
      document.getElementById('modalQuantity').value = 1;
      document.getElementById('productModal').classList.add('active');
    }

    function closeProductModal() {
      document.getElementById('productModal').classList.remove('active');
      modalProduct = null;
    }

    function modalAdjust(delta) {
      const input = document.getElementById('modalQuantity');
      const next = Number(input.value) + delta;
      if (next >= 1 && next <= 99) input.value = next;
    }

    document.getElementById('modalAddToCart').addEventListener('click', async () => {
      if (!modalProduct) return;
      const quantity = Number(document.getElementById('modalQuantity').value);
      const data = await postJson('/api/cart/add', { productId: modalProduct.productId, quantity });
      if (data.success === false) {
        showToast(data.message || 'Could not add item');
        return;
      }
      updateCartBadge(data.itemCount);
      if (data.notice) showToast(data.notice);
      setTimeout(closeProductModal, 400);
    });

    document.querySelectorAll('#categoryFilters button').forEach(button => {
      button.addEventListener('click', () => {
        document.querySelectorAll('#categoryFilters button').forEach(b => b.classList.remove('active'));
        button.classList.add('active');
        currentCategory = button.dataset.category;
        loadProducts();
      });
    });

    function performSearch() {
      currentSearch = document.getElementById('searchInput').value.trim();
      loadProducts();
    }
    document.getElementById('searchBtn').addEventListener('click', performSearch);
    document.getElementById('searchInput').addEventListener('keypress', (event) => {
      if (event.key === 'Enter') performSearch();
    });

    document.getElementById('sortSelect').addEventListener('change', (event) => {
      currentSort = event.target.value;
      loadProducts();
    });

    document.addEventListener('keydown', (event) => {
      if (event.key === 'Escape') closeProductModal();
    });

    const urlCategory = new URLSearchParams(location.search).get('category');
    if (urlCategory) {
      const button = document.querySelector(`[data-category="${urlCategory}"]`);
      if (button) button.click(); else loadProducts();
    } else {
      loadProducts();
    }
"#;

const CHECKOUT_BODY: &str = r#"
    <h1>Checkout</h1>
    <div class="row" style="align-items:flex-start;">
      <form id="checkoutForm" class="card" style="flex:2; min-width:300px;">
        <label for="fullName">Full Name</label>
        <input id="fullName" name="fullName">
        <label for="phone">Phone</label>
        <input id="phone" name="phone">
        <label for="address">Delivery Address</label>
        <textarea id="address" name="address" rows="3" required></textarea>
        <label>Payment Method</label>
        <div class="row">
          <label class="row" style="font-weight:400;"><input type="radio" name="paymentMethod" value="cash" style="width:auto;" checked> Cash</label>
          <label class="row" style="font-weight:400;"><input type="radio" name="paymentMethod" value="card" style="width:auto;"> Card</label>
          <label class="row" style="font-weight:400;"><input type="radio" name="paymentMethod" value="online" style="width:auto;"> Online</label>
        </div>
        <label for="notes">Notes</label>
        <textarea id="notes" name="notes" rows="2" placeholder="Any special instructions?"></textarea>
        <button type="button" class="primary" id="placeOrderBtn" style="margin-top:1rem; width:100%;">Place Order ✓</button>
      </form>
      <div class="card" style="flex:1; min-width:260px;">
        <h3 style="margin-top:0;">Order Summary</h3>
        <div id="summaryItems"></div>
        <div class="row spread"><span>Subtotal</span><span id="summarySubtotal">$0.00</span></div>
        <div class="row spread"><span>Delivery</span><span id="summaryDelivery">$0.00</span></div>
        <div class="row spread"><strong>Total</strong><strong id="summaryTotal">$0.00</strong></div>
      </div>
    </div>
"#;

const CHECKOUT_SCRIPT: &str = r#"
    async function loadSummary() {
      const data = await refreshCart(false);
      if (!data) return;
      const box = document.getElementById('summaryItems');
      if (!data.items.length) {
        box.innerHTML = '<p class="muted">Your cart is empty</p>';
      } else {
        box.innerHTML = data.items.map(item => `
          <div class="row spread">
            <span>${categoryEmoji(item.category)} ${escapeHtml(item.productName)} × ${item.quantity}</span>
            <span>${money(item.price * item.quantity)}</span>
          </div>
        `).join('');
      }
      document.getElementById('summarySubtotal').textContent = money(data.totals.subtotal);
      document.getElementById('summaryDelivery').textContent = money(data.totals.deliveryFee);
      document.getElementById('summaryTotal').textContent = money(data.totals.total);
    }

    function onCartChanged() { loadSummary(); }

    async function prefillUser() {
      try {
        const session = await fetchJson('/api/session');
        if (session.loggedIn && session.user) {
          if (session.user.fullName) document.getElementById('fullName').value = session.user.fullName;
          if (session.user.phone) document.getElementById('phone').value = session.user.phone;
        }
      } catch (err) { /* prefill only */ }
    }

    document.getElementById('placeOrderBtn').addEventListener('click', async () => {
      const form = document.getElementById('checkoutForm');
      if (!form.checkValidity()) {
        form.reportValidity();
        return;
      }
      const button = document.getElementById('placeOrderBtn');
      const originalLabel = button.textContent;
      button.disabled = true;
      button.textContent = 'Processing...';
      try {
        const data = await postJson('/api/checkout', {
          deliveryAddress: document.getElementById('address').value.trim(),
          paymentMethod: form.paymentMethod.value,
          notes: document.getElementById('notes').value.trim()
        });
        if (data.success) {
          showToast('Order placed successfully!');
          updateCartBadge(0);
          setTimeout(() => { location.href = '/orders?orderId=' + data.orderId; }, 1500);
        } else {
          showToast(data.message || 'Failed to place order. Please try again.');
          button.disabled = false;
          button.textContent = originalLabel;
        }
      } catch (err) {
        showToast('Failed to place order. Please try again.');
        button.disabled = false;
        button.textContent = originalLabel;
      }
    });

    prefillUser();
    loadSummary();
"#;

const ORDERS_BODY: &str = r#"
    <h1>My Orders</h1>
    <div class="row" id="statusTabs" style="margin-bottom:1rem;">
      <button class="ghost active" data-status="all">All</button>
      <button class="ghost" data-status="pending">Pending</button>
      <button class="ghost" data-status="confirmed">Confirmed</button>
      <button class="ghost" data-status="preparing">Preparing</button>
      <button class="ghost" data-status="ready">Ready</button>
      <button class="ghost" data-status="delivered">Delivered</button>
      <button class="ghost" data-status="cancelled">Cancelled</button>
    </div>
    <p id="fallbackNote" class="muted" style="display:none;">Showing sample orders while order history is unreachable.</p>
    <div id="ordersList"><p class="muted">Loading orders...</p></div>
    <p id="emptyState" class="muted" style="display:none;">No orders yet.</p>

    <div class="modal" id="orderModal">
      <div class="card">
        <div class="row spread">
          <h2 style="margin:0;">Order #<span id="modalOrderId"></span></h2>
          <button class="ghost" onclick="closeOrderModal()">✕</button>
        </div>
        <span class="status-pill" id="modalOrderStatus"></span>
        <h4>Delivery Progress</h4>
        <ul class="timeline" id="modalTimeline"></ul>
        <h4>Items</h4>
        <div id="modalOrderItems"></div>
        <h4>Delivery</h4>
        <p id="modalAddress" class="muted"></p>
        <p id="modalNotes" class="muted"></p>
        <div class="row spread"><span>Total</span><strong id="modalTotal"></strong></div>
        <button class="primary" style="width:100%; margin-top:1rem;" id="reorderBtn">Reorder</button>
      </div>
    </div>
"#;

const ORDERS_SCRIPT: &str = r#"
    let currentStatus = 'all';
    let currentOrders = [];
    let openOrder = null;

    const stageLabels = {
      pending: 'Order Placed',
      confirmed: 'Confirmed',
      preparing: 'Preparing',
      ready: 'Ready for Delivery',
      delivered: 'Delivered'
    };

    async function loadOrders() {
      const params = currentStatus === 'all' ? '' : '?status=' + currentStatus;
      const list = document.getElementById('ordersList');
      try {
        const data = await fetchJson('/api/orders' + params);
        currentOrders = data.orders;
        document.getElementById('fallbackNote').style.display = data.fallback ? 'block' : 'none';
        renderOrders(currentOrders);
      } catch (err) {
        list.innerHTML = '<p class="muted">Failed to load orders. Please refresh.</p>';
      }
    }

    function renderOrders(orders) {
      const list = document.getElementById('ordersList');
      const empty = document.getElementById('emptyState');
      if (!orders.length) {
        list.innerHTML = '';
        empty.style.display = 'block';
        return;
      }
      empty.style.display = 'none';
      list.innerHTML = orders.map(order => `
        <div class="card" style="margin-bottom:0.8rem; cursor:pointer;" data-id="${order.orderId}">
          <div class="row spread">
            <div>
              <strong>Order #${order.orderId}</strong>
              <div class="muted">📅 ${escapeHtml(order.orderDate)}</div>
            </div>
            <span class="status-pill">${escapeHtml(order.status)}</span>
          </div>
          <div class="row spread" style="margin-top:0.5rem;">
            <span class="muted">${order.items.slice(0, 3).map(item =>
              categoryEmoji(item.category) + ' ' + escapeHtml(item.productName)).join(', ')}
              ${order.items.length > 3 ? ' +' + (order.items.length - 3) + ' more' : ''}</span>
            <strong>${money(order.totalAmount)}</strong>
          </div>
        </div>
      `).join('');
      list.querySelectorAll('.card').forEach(card => {
        card.addEventListener('click', () => {
          const order = currentOrders.find(o => o.orderId === Number(card.dataset.id));
          if (order) openOrderModal(order);
        });
      });
    }

    function openOrderModal(order) {
      openOrder = order;
      document.getElementById('modalOrderId').textContent = order.orderId;
      document.getElementById('modalOrderStatus').textContent = order.status;
      document.getElementById('modalTimeline').innerHTML = order.timeline.map(stage => `
        <li class="${stage.state}">
          <span>${stageLabels[stage.label] || stage.label}</span>
          <span class="muted">${stage.timestamp ? escapeHtml(stage.timestamp) : 'Pending'}</span>
        </li>
      `).join('');
      document.getElementById('modalOrderItems').innerHTML = order.items.map(item => `
        <div class="row spread">
          <span>${categoryEmoji(item.category)} ${escapeHtml(item.productName)} × ${item.quantity}</span>
          <span>${money(item.quantity * item.unitPrice)}</span>
        </div>
      `).join('');
      document.getElementById('modalAddress').textContent = order.deliveryAddress;
      document.getElementById('modalNotes').textContent = order.notes || 'No special instructions';
      document.getElementById('modalTotal').textContent = money(order.totalAmount);
      document.getElementById('orderModal').classList.add('active');
    }

    function closeOrderModal() {
      document.getElementById('orderModal').classList.remove('active');
      openOrder = null;
    }

    document.getElementById('reorderBtn').addEventListener('click', async () => {
      if (!openOrder) return;
      const data = await postJson('/api/reorder', { orderId: openOrder.orderId });
      if (data.success === false) {
        showToast(data.message || 'Could not reorder');
        return;
      }
      updateCartBadge(data.itemCount);
      showToast(data.notice || 'Items added to cart!');
      setTimeout(() => { location.href = '/menu'; }, 1000);
    });

    document.querySelectorAll('#statusTabs button').forEach(button => {
      button.addEventListener('click', () => {
        document.querySelectorAll('#statusTabs button').forEach(b => b.classList.remove('active'));
        button.classList.add('active');
        currentStatus = button.dataset.status;
        loadOrders();
      });
    });

    document.addEventListener('keydown', (event) => {
      if (event.key === 'Escape') closeOrderModal();
    });

    loadOrders();
"#;

const LOGIN_BODY: &str = r#"
    <div class="card" style="max-width:420px; margin:3rem auto;">
      <h1 style="margin-top:0;">Welcome back</h1>
      <form id="loginForm">
        <label for="username">Username</label>
        <input id="username" name="username" value="{{REMEMBERED}}" required>
        <label for="password">Password</label>
        <input id="password" name="password" type="password" required>
        <label class="row" style="font-weight:400; margin-top:0.75rem;">
          <input type="checkbox" id="rememberMe" style="width:auto;"> Remember me
        </label>
        <button type="submit" class="primary" style="width:100%; margin-top:1rem;">Login</button>
      </form>
      <div class="msg" id="loginMsg"></div>
      <p class="muted" style="margin-top:1rem;">New here? <a href="/register">Create an account</a></p>
    </div>
"#;

const LOGIN_SCRIPT: &str = r#"
    document.getElementById('loginForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const msg = document.getElementById('loginMsg');
      try {
        const data = await postJson('/api/login', {
          username: document.getElementById('username').value,
          password: document.getElementById('password').value,
          remember: document.getElementById('rememberMe').checked
        });
        if (data.success) {
          msg.className = 'msg show success';
          msg.textContent = 'Login successful! Redirecting...';
          const redirectParam = new URLSearchParams(location.search).get('redirect');
          const target = redirectParam ? '/' + redirectParam : (data.redirect || '/');
          setTimeout(() => { location.href = target; }, 1000);
        } else {
          msg.className = 'msg show error';
          msg.textContent = data.message || 'Invalid username or password';
        }
      } catch (err) {
        msg.className = 'msg show error';
        msg.textContent = 'Login failed. Please try again.';
      }
    });
"#;

const REGISTER_BODY: &str = r#"
    <div class="card" style="max-width:420px; margin:3rem auto;">
      <h1 style="margin-top:0;">Create an account</h1>
      <form id="regForm">
        <label for="username">Username</label>
        <input id="username" required>
        <label for="email">Email</label>
        <input id="email" type="email" required>
        <label for="fullName">Full Name (optional)</label>
        <input id="fullName">
        <label for="phone">Phone (optional)</label>
        <input id="phone">
        <label for="password">Password</label>
        <input id="password" type="password" required>
        <button type="submit" class="primary" style="width:100%; margin-top:1rem;">Register</button>
      </form>
      <div class="msg" id="regMsg"></div>
      <p class="muted" style="margin-top:1rem;">Already registered? <a href="/login">Login</a></p>
    </div>
"#;

const REGISTER_SCRIPT: &str = r#"
    document.getElementById('regForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const msg = document.getElementById('regMsg');
      try {
        const data = await postJson('/api/register', {
          username: document.getElementById('username').value,
          password: document.getElementById('password').value,
          email: document.getElementById('email').value,
          fullName: document.getElementById('fullName').value,
          phone: document.getElementById('phone').value
        });
        if (data.success) {
          msg.className = 'msg show success';
          msg.textContent = 'Registration successful! Redirecting to login...';
          setTimeout(() => { location.href = '/login'; }, 1500);
        } else {
          msg.className = 'msg show error';
          msg.textContent = data.message || 'Registration failed. Please try again.';
        }
      } catch (err) {
        msg.className = 'msg show error';
        msg.textContent = 'Registration failed. Please try again.';
      }
    });
"#;

const ADMIN_BODY: &str = r#"
    <h1>Admin Dashboard</h1>
    <p class="muted">Last update: <span id="lastUpdate">never</span></p>
    <div class="stats">
      <div class="card"><div class="muted">Products</div><div class="value" id="totalProducts">...</div></div>
      <div class="card"><div class="muted">Orders</div><div class="value" id="totalOrders">...</div></div>
      <div class="card"><div class="muted">Users</div><div class="value" id="totalUsers">...</div></div>
      <div class="card"><div class="muted">Revenue</div><div class="value" id="totalRevenue">...</div></div>
    </div>

    <section class="card" style="margin-bottom:1.5rem;">
      <div class="row spread">
        <h2 style="margin:0;">Products</h2>
        <button class="primary" id="addProductBtn">Add Product</button>
      </div>
      <table>
        <thead><tr><th>ID</th><th>Name</th><th>Category</th><th>Price</th><th>Stock</th><th>Status</th><th></th></tr></thead>
        <tbody id="productsTableBody"><tr><td colspan="7" class="muted">Loading...</td></tr></tbody>
      </table>
    </section>

    <section class="card" style="margin-bottom:1.5rem;">
      <h2 style="margin-top:0;">Orders</h2>
      <div class="row" id="orderFilters" style="margin-bottom:0.75rem;">
        <button class="ghost active" data-status="all">All</button>
        <button class="ghost" data-status="pending">Pending</button>
        <button class="ghost" data-status="preparing">Preparing</button>
        <button class="ghost" data-status="delivered">Delivered</button>
        <button class="ghost" data-status="cancelled">Cancelled</button>
      </div>
      <table>
        <thead><tr><th>ID</th><th>Date</th><th>Total</th><th>Status</th></tr></thead>
        <tbody id="ordersTableBody"><tr><td colspan="4" class="muted">Loading...</td></tr></tbody>
      </table>
    </section>

    <section class="card">
      <h2 style="margin-top:0;">Users</h2>
      <input id="userSearch" placeholder="Search by username or email..." style="max-width:300px; margin-bottom:0.75rem;">
      <table>
        <thead><tr><th>ID</th><th>Username</th><th>Email</th><th>Role</th><th>Joined</th></tr></thead>
        <tbody id="usersTableBody"><tr><td colspan="5" class="muted">Loading...</td></tr></tbody>
      </table>
    </section>

    <div class="modal" id="productModal">
      <div class="card">
        <div class="row spread">
          <h2 id="productModalTitle" style="margin:0;">Add New Product</h2>
          <button class="ghost" onclick="closeProductModal()">✕</button>
        </div>
        <form id="productForm">
          <input type="hidden" id="productId">
          <label for="productName">Name</label>
          <input id="productName" required>
          <label for="productCategory">Category</label>
          <select id="productCategory">
            <option value="appetizer">Appetizer</option>
            <option value="main_course">Main Course</option>
            <option value="dessert">Dessert</option>
            <option value="beverage">Beverage</option>
            <option value="other">Other</option>
          </select>
          <label for="productPrice">Price</label>
          <input id="productPrice" type="number" step="0.01" min="0" required>
          <label for="productStock">Stock</label>
          <input id="productStock" type="number" min="0" value="0">
          <label for="productDescription">Description</label>
          <textarea id="productDescription" rows="2"></textarea>
          <label for="productStatus">Status</label>
          <select id="productStatus">
            <option value="available">Available</option>
            <option value="unavailable">Unavailable</option>
          </select>
          <button type="submit" class="primary" style="width:100%; margin-top:1rem;">Save Product</button>
        </form>
      </div>
    </div>
"#;

const ADMIN_SCRIPT: &str = r#"
    let adminProducts = [];
    let adminOrderFilter = 'all';

    async function loadSummary() {
      try {
        const data = await fetchJson('/api/admin/summary');
        document.getElementById('totalProducts').textContent = data.summary.totalProducts;
        document.getElementById('totalOrders').textContent = data.summary.totalOrders;
        document.getElementById('totalUsers').textContent = data.summary.totalUsers;
        document.getElementById('totalRevenue').textContent = money(data.summary.revenue);
        document.getElementById('lastUpdate').textContent = new Date().toLocaleTimeString();
      } catch (err) {
        showToast('Failed to refresh statistics');
      }
    }

    async function loadProducts() {
      const tbody = document.getElementById('productsTableBody');
      try {
        const data = await fetchJson('/api/admin/products');
        adminProducts = data.products;
        if (!adminProducts.length) {
          tbody.innerHTML = '<tr><td colspan="7" class="muted">No products found</td></tr>';
          return;
        }
        tbody.innerHTML = adminProducts.map(product => `
          <tr>
            <td>${product.productId}</td>
            <td>${escapeHtml(product.productName)}</td>
            <td>${escapeHtml(product.category)}</td>
            <td>${money(product.price)}</td>
            <td>${product.stock}</td>
            <td><span class="status-pill">${escapeHtml(product.status)}</span></td>
            <td>
              <button class="ghost" onclick="editProduct(${product.productId})">Edit</button>
              <button class="ghost" onclick="deleteProduct(${product.productId})">Delete</button>
            </td>
          </tr>
        `).join('');
      } catch (err) {
        tbody.innerHTML = '<tr><td colspan="7" class="muted">Failed to load products</td></tr>';
      }
    }

    async function loadOrders() {
      const tbody = document.getElementById('ordersTableBody');
      const params = adminOrderFilter === 'all' ? '' : '?status=' + adminOrderFilter;
      try {
        const data = await fetchJson('/api/admin/orders' + params);
        if (!data.orders.length) {
          tbody.innerHTML = '<tr><td colspan="4" class="muted">No orders found</td></tr>';
          return;
        }
        tbody.innerHTML = data.orders.map(order => `
          <tr>
            <td>#${order.orderId}</td>
            <td>${escapeHtml(order.orderDate)}</td>
            <td>${money(order.totalAmount)}</td>
            <td><span class="status-pill">${escapeHtml(order.status)}</span></td>
          </tr>
        `).join('');
      } catch (err) {
        tbody.innerHTML = '<tr><td colspan="4" class="muted">Failed to load orders</td></tr>';
      }
    }

    async function loadUsers() {
      const tbody = document.getElementById('usersTableBody');
      const term = document.getElementById('userSearch').value.trim();
      const params = term ? '?search=' + encodeURIComponent(term) : '';
      try {
        const data = await fetchJson('/api/admin/users' + params);
        if (!data.users.length) {
          tbody.innerHTML = '<tr><td colspan="5" class="muted">No users found</td></tr>';
          return;
        }
        tbody.innerHTML = data.users.map(user => `
          <tr>
            <td>${user.id}</td>
            <td>${escapeHtml(user.username)}</td>
            <td>${escapeHtml(user.email || 'N/A')}</td>
            <td><span class="status-pill">${escapeHtml(user.role)}</span></td>
            <td>${escapeHtml(user.createdAt || 'N/A')}</td>
          </tr>
        `).join('');
      } catch (err) {
        tbody.innerHTML = '<tr><td colspan="5" class="muted">Failed to load users</td></tr>';
      }
    }

    function openProductModal(title) {
      document.getElementById('productModalTitle').textContent = title;
      document.getElementById('productModal').classList.add('active');
    }

    function closeProductModal() {
      document.getElementById('productModal').classList.remove('active');
    }

    document.getElementById('addProductBtn').addEventListener('click', () => {
      document.getElementById('productForm').reset();
      document.getElementById('productId').value = '';
      openProductModal('Add New Product');
    });

    function editProduct(productId) {
      const product = adminProducts.find(p => p.productId === productId);
      if (!product) return;
      document.getElementById('productId').value = product.productId;
      document.getElementById('productName').value = product.productName;
      document.getElementById('productCategory').value = product.category;
      document.getElementById('productPrice').value = product.price;
      document.getElementById('productStock').value = product.stock;
      document.getElementById('productDescription').value = product.description || '';
      document.getElementById('productStatus').value = product.status;
      openProductModal('Edit Product');
    }

    async function saveProduct(payload, successMessage) {
      const data = await postJson('/api/admin/products', payload);
      if (data.success) {
        showToast(successMessage);
        closeProductModal();
        loadProducts();
        loadSummary();
      } else {
        showToast(data.message || 'Failed to save product');
      }
    }

    async function deleteProduct(productId) {
      if (!confirm('Are you sure you want to delete this product?')) return;
      saveProduct({ action: 'delete', productId }, 'Product deleted successfully');
    }

    document.getElementById('productForm').addEventListener('submit', (event) => {
      event.preventDefault();
      const productId = document.getElementById('productId').value;
      saveProduct({
        action: productId ? 'update' : 'add',
        productId: productId ? Number(productId) : null,
        name: document.getElementById('productName').value,
        category: document.getElementById('productCategory').value,
        price: Number(document.getElementById('productPrice').value),
        stock: Number(document.getElementById('productStock').value),
        description: document.getElementById('productDescription').value,
        status: document.getElementById('productStatus').value
      }, productId ? 'Product updated successfully' : 'Product added successfully');
    });

    document.querySelectorAll('#orderFilters button').forEach(button => {
      button.addEventListener('click', () => {
        document.querySelectorAll('#orderFilters button').forEach(b => b.classList.remove('active'));
        button.classList.add('active');
        adminOrderFilter = button.dataset.status;
        loadOrders();
      });
    });

    document.getElementById('userSearch').addEventListener('input', () => loadUsers());

    function refreshAll() {
      loadSummary();
      loadProducts();
      loadOrders();
      loadUsers();
    }

    refreshAll();
    const statsTimer = setInterval(loadSummary, 30000);
    window.addEventListener('pagehide', () => clearInterval(statsTimer));
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_prefills_the_remembered_username() {
        let html = render_login(Some("alice"));
        assert!(html.contains(r#"value="alice""#));
        assert!(!html.contains("{{REMEMBERED}}"));
    }

    #[test]
    fn remembered_username_is_escaped() {
        let html = render_login(Some(r#""><script>"#));
        assert!(!html.contains("\"><script>"));
    }

    #[test]
    fn every_page_renders_the_shell() {
        for html in [
            render_home(),
            render_menu(),
            render_checkout(),
            render_orders(),
            render_login(None),
            render_register(),
            render_admin(),
        ] {
            assert!(html.contains("FoodHub"));
            assert!(html.contains("id=\"toast\""));
            assert!(!html.contains("{{TITLE}}"));
            assert!(!html.contains("{{BODY}}"));
            assert!(!html.contains("{{SCRIPT}}"));
            assert!(!html.contains('\u{2014}'));
        }
    }
}
