// src/script.rs

//! Built-in script played when no configuration supplies one.

/// A short Python data pipeline with an embedded SQL query.
pub const DATA_PIPELINE_SCRIPT: &[&str] = &[
    "import pandas as pd",
    "import numpy as np",
    "import sqlalchemy as sql",
    "import seaborn as sns",
    "import pytorch as torch",
    "import scipy as sp",
    "def generate_business_insights(engine):",
    "    # Extract: Pulling targeted growth metrics via SQL",
    "    query = \"\"\"",
    "SELECT date, revenue, churn_rate",
    "FROM monthly_report",
    "WHERE region = 'Global'",
    "\"\"\"",
    "    df = pd.read_sql(query, engine)",
    "    # Transform: Cleaning data and calculating KPIs",
    "    df['growth_pct'] = df['revenue'].pct_change()",
    "    # Load: Returning interactive visualization",
    "    return create_dynamic_dashboard(df)",
    "def predict_market_trends(data):",
    "    # Preprocessing messy business data",
    "    X, y = preprocess_features(data)",
    "    # Training the predictive model",
    "    model = RandomForestRegressor(n_estimators=100)",
    "    model.fit(X_train, y_train)",
    "    # Returning actionable forecasts",
    "    forecast = model.predict(future_dates)",
    "    return forecast",
];

/// Owned copy of [`DATA_PIPELINE_SCRIPT`], ready for a `TypingConfig`.
pub fn data_pipeline_lines() -> Vec<String> {
    DATA_PIPELINE_SCRIPT.iter().map(|line| line.to_string()).collect()
}
