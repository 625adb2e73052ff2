//! Welcome banner written to every new connection before the name prompt.

pub const WELCOME_BANNER: &str = concat!(
    "Welcome to TCP-Chat!\n",
    "         _nnnn_\n",
    "        dGGGGMMb\n",
    "       @p~qp~~qMb\n",
    "       M|@||@) M|\n",
    "       @,----.JM|\n",
    "      JS^\\__/  qKL\n",
    "     dZP        qKRb\n",
    "    dZP          qKKb\n",
    "   fZP            SMMb\n",
    "   HZM            MMMM\n",
    "   FqM            MMMM\n",
    " __| \".        |\\dS\"qML\n",
    " |    `.       | `' \\Zq\n",
    "_)      \\.___.,|     .'\n",
    "\\____   )MMMMMP|   .'\n",
    "     `-'       `--'\n",
);
