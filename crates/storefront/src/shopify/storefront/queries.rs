//! Storefront API GraphQL documents.
//!
//! Fragments are `macro_rules!` string literals so each document can be
//! assembled with `concat!` at compile time. Every catalog and cart query
//! takes a `$country` variable for `@inContext`.

macro_rules! image_fields {
    () => {
        "fragment ImageFields on Image { url altText width height }\n"
    };
}

macro_rules! product_card_fields {
    () => {
        "fragment ProductCardFields on Product {
            id handle title availableForSale updatedAt
            featuredImage { ...ImageFields }
            priceRange {
                minVariantPrice { amount currencyCode }
                maxVariantPrice { amount currencyCode }
            }
            variants(first: 1) {
                edges { cursor node {
                    id title availableForSale quantityAvailable
                    price { amount currencyCode }
                } }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }\n"
    };
}

macro_rules! cart_fields {
    () => {
        "fragment CartFields on Cart {
            id checkoutUrl totalQuantity
            cost {
                subtotalAmount { amount currencyCode }
                totalAmount { amount currencyCode }
            }
            lines(first: 100) {
                edges { cursor node {
                    id quantity
                    cost {
                        amountPerQuantity { amount currencyCode }
                        totalAmount { amount currencyCode }
                    }
                    merchandise {
                        ... on ProductVariant {
                            id title quantityAvailable
                            image { ...ImageFields }
                            product { handle title }
                        }
                    }
                } }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }\n"
    };
}

/// A named GraphQL document.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

pub const PRODUCT_BY_HANDLE: Operation = Operation {
    name: "ProductByHandle",
    document: concat!(
        "query ProductByHandle($handle: String!, $country: CountryCode)
        @inContext(country: $country) {
            product(handle: $handle) {
                id handle title description descriptionHtml vendor availableForSale updatedAt
                seo { title description }
                featuredImage { ...ImageFields }
                priceRange {
                    minVariantPrice { amount currencyCode }
                    maxVariantPrice { amount currencyCode }
                }
                options { name optionValues { name } }
                images(first: 10) {
                    edges { cursor node { ...ImageFields } }
                    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
                }
                variants(first: 100) {
                    edges { cursor node {
                        id title availableForSale quantityAvailable
                        price { amount currencyCode }
                        compareAtPrice { amount currencyCode }
                        selectedOptions { name value }
                        image { ...ImageFields }
                    } }
                    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
                }
            }
        }\n",
        image_fields!()
    ),
};

pub const PRODUCTS: Operation = Operation {
    name: "Products",
    document: concat!(
        "query Products(
            $first: Int, $after: String, $last: Int, $before: String,
            $query: String, $sortKey: ProductSortKeys, $reverse: Boolean,
            $country: CountryCode
        ) @inContext(country: $country) {
            products(
                first: $first, after: $after, last: $last, before: $before,
                query: $query, sortKey: $sortKey, reverse: $reverse
            ) {
                edges { cursor node { ...ProductCardFields } }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }\n",
        product_card_fields!(),
        image_fields!()
    ),
};

pub const PRODUCT_RECOMMENDATIONS: Operation = Operation {
    name: "ProductRecommendations",
    document: concat!(
        "query ProductRecommendations($productId: ID!, $country: CountryCode)
        @inContext(country: $country) {
            productRecommendations(productId: $productId, intent: RELATED) {
                ...ProductCardFields
            }
        }\n",
        product_card_fields!(),
        image_fields!()
    ),
};

pub const COLLECTIONS: Operation = Operation {
    name: "Collections",
    document: concat!(
        "query Collections($first: Int!, $after: String, $country: CountryCode)
        @inContext(country: $country) {
            collections(first: $first, after: $after) {
                edges { cursor node {
                    id handle title description updatedAt
                    image { ...ImageFields }
                } }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }\n",
        image_fields!()
    ),
};

pub const COLLECTION_BY_HANDLE: Operation = Operation {
    name: "CollectionByHandle",
    document: concat!(
        "query CollectionByHandle(
            $handle: String!,
            $first: Int, $after: String, $last: Int, $before: String,
            $sortKey: ProductCollectionSortKeys, $reverse: Boolean,
            $country: CountryCode
        ) @inContext(country: $country) {
            collection(handle: $handle) {
                id handle title description updatedAt
                seo { title description }
                image { ...ImageFields }
                products(
                    first: $first, after: $after, last: $last, before: $before,
                    sortKey: $sortKey, reverse: $reverse
                ) {
                    edges { cursor node { ...ProductCardFields } }
                    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
                }
            }
        }\n",
        product_card_fields!(),
        image_fields!()
    ),
};

pub const VARIANT_NODES: Operation = Operation {
    name: "VariantNodes",
    document: concat!(
        "query VariantNodes($ids: [ID!]!, $country: CountryCode)
        @inContext(country: $country) {
            nodes(ids: $ids) {
                __typename
                ... on ProductVariant {
                    id title availableForSale quantityAvailable
                    price { amount currencyCode }
                    image { ...ImageFields }
                    product { handle title featuredImage { ...ImageFields } }
                }
            }
        }\n",
        image_fields!()
    ),
};

pub const MENU: Operation = Operation {
    name: "Menu",
    document: "query Menu($handle: String!) {
        menu(handle: $handle) {
            items { title url items { title url } }
        }
    }",
};

pub const SHOP_POLICIES: Operation = Operation {
    name: "ShopPolicies",
    document: "query ShopPolicies {
        shop {
            privacyPolicy { handle title body url }
            refundPolicy { handle title body url }
            shippingPolicy { handle title body url }
            termsOfService { handle title body url }
        }
    }",
};

pub const SITEMAP_PRODUCTS: Operation = Operation {
    name: "SitemapProducts",
    document: "query SitemapProducts($after: String) {
        entries: products(first: 250, after: $after) {
            edges { cursor node { handle updatedAt } }
            pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
        }
    }",
};

pub const SITEMAP_COLLECTIONS: Operation = Operation {
    name: "SitemapCollections",
    document: "query SitemapCollections($after: String) {
        entries: collections(first: 250, after: $after) {
            edges { cursor node { handle updatedAt } }
            pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
        }
    }",
};

pub const CART: Operation = Operation {
    name: "Cart",
    document: concat!(
        "query Cart($cartId: ID!, $country: CountryCode)
        @inContext(country: $country) {
            cart(id: $cartId) { ...CartFields }
        }\n",
        cart_fields!(),
        image_fields!()
    ),
};

pub const CART_CREATE: Operation = Operation {
    name: "CartCreate",
    document: concat!(
        "mutation CartCreate($input: CartInput!, $country: CountryCode)
        @inContext(country: $country) {
            cartCreate(input: $input) {
                cart { ...CartFields }
                userErrors { field message code }
            }
        }\n",
        cart_fields!(),
        image_fields!()
    ),
};

pub const CART_LINES_ADD: Operation = Operation {
    name: "CartLinesAdd",
    document: concat!(
        "mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!, $country: CountryCode)
        @inContext(country: $country) {
            cartLinesAdd(cartId: $cartId, lines: $lines) {
                cart { ...CartFields }
                userErrors { field message code }
            }
        }\n",
        cart_fields!(),
        image_fields!()
    ),
};

pub const CART_LINES_UPDATE: Operation = Operation {
    name: "CartLinesUpdate",
    document: concat!(
        "mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!, $country: CountryCode)
        @inContext(country: $country) {
            cartLinesUpdate(cartId: $cartId, lines: $lines) {
                cart { ...CartFields }
                userErrors { field message code }
            }
        }\n",
        cart_fields!(),
        image_fields!()
    ),
};

pub const CART_LINES_REMOVE: Operation = Operation {
    name: "CartLinesRemove",
    document: concat!(
        "mutation CartLinesRemove($cartId: ID!, $lineIds: [ID!]!, $country: CountryCode)
        @inContext(country: $country) {
            cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
                cart { ...CartFields }
                userErrors { field message code }
            }
        }\n",
        cart_fields!(),
        image_fields!()
    ),
};

pub const CUSTOMER_ACCESS_TOKEN_CREATE: Operation = Operation {
    name: "CustomerAccessTokenCreate",
    document: "mutation CustomerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
        customerAccessTokenCreate(input: $input) {
            customerAccessToken { accessToken expiresAt }
            customerUserErrors { field message code }
        }
    }",
};

pub const CUSTOMER_BY_TOKEN: Operation = Operation {
    name: "CustomerByToken",
    document: "query CustomerByToken($token: String!) {
        customer(customerAccessToken: $token) { id email firstName lastName phone }
    }",
};

pub const CUSTOMER_ACCESS_TOKEN_DELETE: Operation = Operation {
    name: "CustomerAccessTokenDelete",
    document: "mutation CustomerAccessTokenDelete($token: String!) {
        customerAccessTokenDelete(customerAccessToken: $token) {
            deletedAccessToken
            userErrors { field message }
        }
    }",
};
